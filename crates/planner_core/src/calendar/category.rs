//! Category name to bar color lookup.

use crate::model::category::Category;
use log::debug;
use std::collections::HashMap;

/// Result of resolving a category color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColor<'a> {
    pub color: &'a str,
    /// `false` when the fallback color was used.
    pub found: bool,
}

/// Read-only name to color map built once per render.
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    colors: HashMap<String, String>,
}

impl CategoryRegistry {
    /// Builds the registry; a later category replaces an earlier one of the same name.
    pub fn from_categories(categories: &[Category]) -> Self {
        let colors = categories
            .iter()
            .map(|category| (category.name.clone(), category.color.clone()))
            .collect();
        Self { colors }
    }

    pub fn color_for(&self, name: &str) -> Option<&str> {
        self.colors.get(name).map(String::as_str)
    }

    /// Resolves `name`, falling back to `fallback` when the category is unknown.
    pub fn resolve<'a>(&'a self, name: &str, fallback: &'a str) -> ResolvedColor<'a> {
        match self.color_for(name) {
            Some(color) => ResolvedColor { color, found: true },
            None => {
                debug!(
                    "event=category_fallback module=calendar status=skip name_len={}",
                    name.len()
                );
                ResolvedColor {
                    color: fallback,
                    found: false,
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
