//! Date range to grid rectangle decomposition.
//!
//! # Responsibility
//! - Turn an inclusive date range into the rectangles that draw its bar.
//!
//! # Invariants
//! - Output is ordered by row; exactly one rectangle per covered row.
//! - Rectangles never overlap and leave no gap between consecutive days.
//! - Multi-row spans emit a head to the row end, full-width bodies, and a
//!   tail from column zero.

use crate::calendar::grid::{DayLookup, YearMonth};
use crate::model::assignment::Assignment;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Grid-space rectangle covering `[start_column, end_column_exclusive)` of `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanRect {
    pub row: u32,
    pub start_column: u32,
    pub end_column_exclusive: u32,
}

impl SpanRect {
    pub fn width_columns(&self) -> u32 {
        self.end_column_exclusive.saturating_sub(self.start_column)
    }
}

/// Decomposition failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanError {
    /// The date has no laid-out cell.
    Unresolved(NaiveDate),
    ReversedRange { start: NaiveDate, end: NaiveDate },
    /// Start and end fall in different months.
    CrossMonth { start: NaiveDate, end: NaiveDate },
}

impl Display for SpanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unresolved(date) => write!(f, "date {date} is not laid out in the grid"),
            Self::ReversedRange { start, end } => {
                write!(f, "span ends ({end}) before it starts ({start})")
            }
            Self::CrossMonth { start, end } => {
                write!(f, "span {start}..={end} crosses a month boundary")
            }
        }
    }
}

impl Error for SpanError {}

/// Decomposes the inclusive range `start..=end` into grid rectangles.
///
/// `days_per_row` must be the row size `lookup` was built with.
///
/// # Errors
/// - `ReversedRange` when `start > end`.
/// - `CrossMonth` when the dates are in different months.
/// - `Unresolved` when either date is missing from `lookup`.
pub fn decompose(
    start: NaiveDate,
    end: NaiveDate,
    lookup: &DayLookup,
    days_per_row: u32,
) -> Result<Vec<SpanRect>, SpanError> {
    if start > end {
        return Err(SpanError::ReversedRange { start, end });
    }
    if YearMonth::of(start) != YearMonth::of(end) {
        return Err(SpanError::CrossMonth { start, end });
    }
    let start_cell = lookup.resolve(start).ok_or(SpanError::Unresolved(start))?;
    let end_cell = lookup.resolve(end).ok_or(SpanError::Unresolved(end))?;
    let days_per_row = days_per_row.max(1);

    if start_cell.row == end_cell.row {
        return Ok(vec![SpanRect {
            row: start_cell.row,
            start_column: start_cell.column,
            end_column_exclusive: end_cell.column + 1,
        }]);
    }

    let mut rects = Vec::with_capacity((end_cell.row - start_cell.row + 1) as usize);
    rects.push(SpanRect {
        row: start_cell.row,
        start_column: start_cell.column,
        end_column_exclusive: days_per_row,
    });
    rects.extend(
        (start_cell.row + 1..end_cell.row).map(|row| SpanRect {
            row,
            start_column: 0,
            end_column_exclusive: days_per_row,
        }),
    );
    rects.push(SpanRect {
        row: end_cell.row,
        start_column: 0,
        end_column_exclusive: end_cell.column + 1,
    });
    Ok(rects)
}

/// Decomposes an assignment's date range.
pub fn decompose_assignment(
    assignment: &Assignment,
    lookup: &DayLookup,
    days_per_row: u32,
) -> Result<Vec<SpanRect>, SpanError> {
    decompose(
        assignment.start_date,
        assignment.end_date,
        lookup,
        days_per_row,
    )
}
