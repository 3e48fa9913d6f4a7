//! Category domain model.
//!
//! # Responsibility
//! - Define the named color class applied to assignment bars.
//!
//! # Invariants
//! - `name` is the lookup key and must not be blank.
//! - `color` is a CSS hex color, `rgb()`/`rgba()` function, or named color.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a category row.
pub type CategoryId = Uuid;

static COLOR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(#([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})|rgba?\(\s*\d{1,3}\s*,\s*\d{1,3}\s*,\s*\d{1,3}\s*(,\s*(0|1|0?\.\d+|1\.0+)\s*)?\)|[a-zA-Z]+)$",
    )
    .expect("color pattern must compile")
});

/// Validation failures for [`Category`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    NilId,
    EmptyName,
    InvalidColor(String),
}

impl Display for CategoryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "category id must not be nil"),
            Self::EmptyName => write!(f, "category name must not be empty"),
            Self::InvalidColor(value) => write!(f, "unsupported category color `{value}`"),
        }
    }
}

impl Error for CategoryValidationError {}

/// Named color class for assignment bars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: color.into(),
        }
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.id.is_nil() {
            return Err(CategoryValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        if !is_supported_color(self.color.trim()) {
            return Err(CategoryValidationError::InvalidColor(self.color.clone()));
        }
        Ok(())
    }
}

/// Returns whether `value` is a color string the SVG scene can carry.
pub fn is_supported_color(value: &str) -> bool {
    COLOR_PATTERN.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::{is_supported_color, Category, CategoryValidationError};

    #[test]
    fn accepts_hex_rgb_and_named_colors() {
        for color in [
            "#fff",
            "#1e88e5",
            "#1e88e5cc",
            "rgb(10, 20, 30)",
            "rgba(55,0,179,0.3)",
            "tomato",
        ] {
            assert!(is_supported_color(color), "{color} should be accepted");
        }
    }

    #[test]
    fn rejects_malformed_colors() {
        for color in ["", "#12", "rgb(1,2)", "red; fill:blue", "url(#x)"] {
            assert!(!is_supported_color(color), "{color} should be rejected");
        }
    }

    #[test]
    fn validate_reports_first_problem() {
        let blank = Category::new(" ", "red");
        assert_eq!(blank.validate(), Err(CategoryValidationError::EmptyName));

        let bad_color = Category::new("school", "not a color");
        assert_eq!(
            bad_color.validate(),
            Err(CategoryValidationError::InvalidColor("not a color".to_string()))
        );

        assert!(Category::new("school", "#1e88e5").validate().is_ok());
    }

    #[test]
    fn serializes_as_flat_object_and_reads_back() {
        let category = Category::new("school", "#1e88e5");

        let value = serde_json::to_value(&category).expect("serialize category");
        assert_eq!(
            value,
            serde_json::json!({
                "id": category.id.to_string(),
                "name": "school",
                "color": "#1e88e5",
            })
        );

        let back: Category = serde_json::from_value(value).expect("deserialize category");
        assert_eq!(back, category);
    }
}
