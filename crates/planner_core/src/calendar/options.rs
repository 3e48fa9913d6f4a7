//! Month view render options.
//!
//! # Invariants
//! - Cell dimensions are finite and strictly positive.
//! - Border width, padding, label height and max bar height are finite and `>= 0`.
//! - Color strings are non-empty.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Options parse/validation errors.
#[derive(Debug)]
pub enum OptionsError {
    Parse(serde_json::Error),
    NonPositive { field: &'static str, value: f64 },
    Negative { field: &'static str, value: f64 },
    EmptyColor(&'static str),
}

impl Display for OptionsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid calendar options: {err}"),
            Self::NonPositive { field, value } => {
                write!(f, "`{field}` must be a finite value > 0, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "`{field}` must be a finite value >= 0, got {value}")
            }
            Self::EmptyColor(field) => write!(f, "`{field}` must not be empty"),
        }
    }
}

impl Error for OptionsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for OptionsError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Geometry and colors used to draw the month view. All sizes are pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarOptions {
    pub border_color: String,
    pub border_width: f64,
    pub day_width: f64,
    pub day_height: f64,
    /// Inset of the day number from the cell's top-left corner.
    pub padding: f64,
    /// Rendered height of the day number label.
    pub label_height: f64,
    /// Bar height at `weight = 1.0`.
    pub max_assignment_height: f64,
    pub today_fill: String,
    pub day_fill: String,
    /// Bar color when an assignment's category is unknown.
    pub fallback_color: String,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            border_color: "black".to_string(),
            border_width: 1.0,
            day_width: 200.0,
            day_height: 200.0,
            padding: 8.0,
            label_height: 16.0,
            max_assignment_height: 40.0,
            today_fill: "rgba(55,0,179,0.3)".to_string(),
            day_fill: "transparent".to_string(),
            fallback_color: "gray".to_string(),
        }
    }
}

impl CalendarOptions {
    /// Parses options from JSON; missing keys take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, OptionsError> {
        let options: Self = serde_json::from_str(raw)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        positive("dayWidth", self.day_width)?;
        positive("dayHeight", self.day_height)?;
        non_negative("borderWidth", self.border_width)?;
        non_negative("padding", self.padding)?;
        non_negative("labelHeight", self.label_height)?;
        non_negative("maxAssignmentHeight", self.max_assignment_height)?;

        for (field, value) in [
            ("borderColor", &self.border_color),
            ("todayFill", &self.today_fill),
            ("dayFill", &self.day_fill),
            ("fallbackColor", &self.fallback_color),
        ] {
            if value.trim().is_empty() {
                return Err(OptionsError::EmptyColor(field));
            }
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), OptionsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(OptionsError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), OptionsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(OptionsError::Negative { field, value })
    }
}
