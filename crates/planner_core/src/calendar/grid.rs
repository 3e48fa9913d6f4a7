//! Month grid layout.
//!
//! # Responsibility
//! - Lay out the days of one month row-major across a width-derived row size.
//! - Index every laid-out day by its calendar date.
//!
//! # Invariants
//! - `days_per_row >= 1`.
//! - Day `d` sits at `row = (d - 1) / days_per_row`, `column = (d - 1) % days_per_row`.
//! - Building a month never removes lookup entries of other months.

use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Grid construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Month outside `1..=12`.
    InvalidMonth(u32),
    /// Year outside the range chrono can represent.
    InvalidYear(i32),
}

impl Display for GridError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth(month) => write!(f, "month must be within 1..=12, got {month}"),
            Self::InvalidYear(year) => write!(f, "year {year} is out of the supported range"),
        }
    }
}

impl Error for GridError {}

/// A validated (year, month) pair. Months are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, GridError> {
        if !(1..=12).contains(&month) {
            return Err(GridError::InvalidMonth(month));
        }
        // Both the first of this month and the first of the next must exist.
        let value = Self { year, month };
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() || value.first_of_next().is_none() {
            return Err(GridError::InvalidYear(year));
        }
        Ok(value)
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Number of days in this month (proleptic Gregorian).
    pub fn days_in_month(&self) -> u32 {
        // Last day of the month is the day before the first of the next one.
        self.first_of_next()
            .and_then(|next| next.pred_opt())
            .map_or(0, |last| last.day())
    }

    /// Returns the date for `day` (1-based) in this month.
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    fn first_of_next(&self) -> Option<NaiveDate> {
        if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year.checked_add(1)?, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        }
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Composite lookup key for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

/// One grid square and its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub row: u32,
    pub column: u32,
}

/// Date-indexed access to built day cells.
#[derive(Debug, Clone, Default)]
pub struct DayLookup {
    cells: HashMap<DayKey, DayCell>,
}

impl DayLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the cell for its date.
    pub fn insert(&mut self, cell: DayCell) {
        self.cells.insert(DayKey::from(cell.date), cell);
    }

    /// Returns the cell holding `date`, if that date has been laid out.
    pub fn resolve(&self, date: NaiveDate) -> Option<&DayCell> {
        self.cells.get(&DayKey::from(date))
    }

    pub fn contains_month(&self, month: YearMonth) -> bool {
        month
            .date(1)
            .is_some_and(|first| self.resolve(first).is_some())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Rows of day cells for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub days_per_row: u32,
    pub rows: Vec<Vec<DayCell>>,
}

impl MonthGrid {
    pub fn row_count(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }

    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Iterates all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &DayCell> {
        self.rows.iter().flatten()
    }
}

/// Number of whole cells that fit in the container, never less than one.
pub fn days_per_row(container_width_px: f64, day_width_px: f64) -> u32 {
    if !container_width_px.is_finite() || !day_width_px.is_finite() || day_width_px <= 0.0 {
        return 1;
    }
    let fitting = (container_width_px / day_width_px).floor();
    if fitting < 1.0 {
        1
    } else if fitting >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        fitting as u32
    }
}

/// Lays out `month` and records every cell in `lookup`.
pub fn build_grid(
    month: YearMonth,
    container_width_px: f64,
    day_width_px: f64,
    lookup: &mut DayLookup,
) -> MonthGrid {
    let per_row = days_per_row(container_width_px, day_width_px);
    let mut rows: Vec<Vec<DayCell>> = Vec::new();

    for (index, date) in (1..=month.days_in_month())
        .filter_map(|day| month.date(day))
        .enumerate()
    {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        let cell = DayCell {
            date,
            row: index / per_row,
            column: index % per_row,
        };
        if cell.column == 0 {
            rows.push(Vec::new());
        }
        if let Some(row) = rows.last_mut() {
            row.push(cell);
        }
        lookup.insert(cell);
    }

    MonthGrid {
        month,
        days_per_row: per_row,
        rows,
    }
}
