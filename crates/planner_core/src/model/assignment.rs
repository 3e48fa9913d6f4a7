//! Assignment domain model.
//!
//! # Responsibility
//! - Define the dated, weighted record drawn as a bar across day cells.
//! - Validate range and weight before the record reaches storage.
//!
//! # Invariants
//! - `id` is stable and never reused for another assignment.
//! - `start_date <= end_date`.
//! - `weight` is finite and non-negative (fraction of the max bar height).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for an assignment.
pub type AssignmentId = Uuid;

/// Validation failures for [`Assignment`].
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentValidationError {
    NilId,
    EmptyTitle,
    ReversedRange { start: NaiveDate, end: NaiveDate },
    InvalidWeight(f64),
}

impl Display for AssignmentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "assignment id must not be nil"),
            Self::EmptyTitle => write!(f, "assignment title must not be empty"),
            Self::ReversedRange { start, end } => {
                write!(f, "assignment ends ({end}) before it starts ({start})")
            }
            Self::InvalidWeight(weight) => {
                write!(f, "assignment weight must be finite and >= 0, got {weight}")
            }
        }
    }
}

impl Error for AssignmentValidationError {}

/// A titled date range with a weight, rendered as a bar in its category color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub title: String,
    /// First covered day, inclusive.
    pub start_date: NaiveDate,
    /// Last covered day, inclusive.
    pub end_date: NaiveDate,
    /// Bar height as a fraction of `max_assignment_height`.
    pub weight: f64,
    /// Category name; resolved to a color at render time.
    pub category: String,
}

impl Assignment {
    /// Creates a new assignment with a generated id.
    ///
    /// Does not validate; call [`Assignment::validate`] before persisting.
    pub fn new(
        title: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        weight: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            start_date,
            end_date,
            weight,
            category: category.into(),
        }
    }

    /// Creates an assignment with a caller-provided id.
    ///
    /// Used by storage read paths where identity already exists.
    pub fn with_id(
        id: AssignmentId,
        title: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        weight: f64,
        category: impl Into<String>,
    ) -> Result<Self, AssignmentValidationError> {
        if id.is_nil() {
            return Err(AssignmentValidationError::NilId);
        }
        Ok(Self {
            id,
            title: title.into(),
            start_date,
            end_date,
            weight,
            category: category.into(),
        })
    }

    /// Checks record invariants.
    pub fn validate(&self) -> Result<(), AssignmentValidationError> {
        if self.id.is_nil() {
            return Err(AssignmentValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(AssignmentValidationError::EmptyTitle);
        }
        if self.start_date > self.end_date {
            return Err(AssignmentValidationError::ReversedRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(AssignmentValidationError::InvalidWeight(self.weight));
        }
        Ok(())
    }

    /// Number of days covered, counting both ends.
    ///
    /// Returns `0` for a reversed range.
    pub fn span_days(&self) -> u32 {
        let days = (self.end_date - self.start_date).num_days() + 1;
        u32::try_from(days.max(0)).unwrap_or(0)
    }
}
