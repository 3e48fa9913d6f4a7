//! Draw primitives and click regions for the month view.
//!
//! # Responsibility
//! - Translate day cells and span rectangles into pixel-space shapes.
//! - Register a click region per cell and per bar rectangle.
//! - Serialize a scene to SVG for hosts that draw markup.
//!
//! # Invariants
//! - `emit` clears the scene before writing; repeated calls never accumulate.
//! - Regions are stored in draw order, and hit testing picks the last match,
//!   so bars (drawn after cells) win on overlap.

use crate::calendar::category::CategoryRegistry;
use crate::calendar::grid::MonthGrid;
use crate::calendar::options::CalendarOptions;
use crate::calendar::span::SpanRect;
use crate::model::assignment::Assignment;
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Filled, optionally stroked rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub stroke: Option<String>,
    pub stroke_width: f64,
}

/// Text anchored at its baseline-left point.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(DrawRect),
    Text(TextLabel),
}

/// Domain value bound to a click region.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionTarget {
    Day(NaiveDate),
    Assignment(Assignment),
}

/// Axis-aligned clickable area.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub target: RegionTarget,
}

impl HitRegion {
    /// Half-open containment: the right and bottom edges belong to the neighbor.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Rendered output of one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<Shape>,
    pub regions: Vec<HitRegion>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.width = 0.0;
        self.height = 0.0;
        self.shapes.clear();
        self.regions.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.regions.is_empty()
    }

    /// Returns the topmost region under the point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&RegionTarget> {
        self.regions
            .iter()
            .rev()
            .find(|region| region.contains(x, y))
            .map(|region| &region.target)
    }

    /// Serializes the scene as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        self.to_string()
    }

    /// Writes the scene as a standalone SVG document into `out`.
    pub fn write_svg(&self, out: &mut impl fmt::Write) -> fmt::Result {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            self.width, self.height
        )?;
        for shape in &self.shapes {
            match shape {
                Shape::Rect(rect) => {
                    write!(
                        out,
                        r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}""#,
                        rect.x,
                        rect.y,
                        rect.width,
                        rect.height,
                        escape_xml(&rect.fill)
                    )?;
                    if let Some(stroke) = &rect.stroke {
                        write!(
                            out,
                            r#" stroke="{}" stroke-width="{}""#,
                            escape_xml(stroke),
                            rect.stroke_width
                        )?;
                    }
                    out.write_str("/>\n")?;
                }
                Shape::Text(label) => {
                    writeln!(
                        out,
                        r#"  <text x="{}" y="{}">{}</text>"#,
                        label.x,
                        label.y,
                        escape_xml(&label.text)
                    )?;
                }
            }
        }
        out.write_str("</svg>\n")
    }
}

/// Renders the SVG document.
impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_svg(f)
    }
}

/// Decomposed bar rectangles of one assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentBars<'a> {
    pub assignment: &'a Assignment,
    pub rects: Vec<SpanRect>,
}

/// Counters reported by one emit call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitStats {
    pub cells: usize,
    pub bars: usize,
    pub category_fallbacks: usize,
}

/// Writes cells and bars into a [`Scene`].
pub struct SceneEmitter<'a> {
    options: &'a CalendarOptions,
}

impl<'a> SceneEmitter<'a> {
    pub fn new(options: &'a CalendarOptions) -> Self {
        Self { options }
    }

    /// Replaces `scene` with the drawing of `grid` and `bars`.
    pub fn emit(
        &self,
        scene: &mut Scene,
        grid: &MonthGrid,
        bars: &[AssignmentBars<'_>],
        categories: &CategoryRegistry,
        today: NaiveDate,
    ) -> EmitStats {
        let options = self.options;
        let mut stats = EmitStats::default();

        scene.clear();
        scene.width = f64::from(grid.days_per_row) * options.day_width;
        scene.height = f64::from(grid.row_count()) * options.day_height;

        for cell in grid.cells() {
            let x = f64::from(cell.column) * options.day_width;
            let y = f64::from(cell.row) * options.day_height;
            let fill = if cell.date == today {
                &options.today_fill
            } else {
                &options.day_fill
            };

            scene.shapes.push(Shape::Rect(DrawRect {
                x,
                y,
                width: options.day_width,
                height: options.day_height,
                fill: fill.clone(),
                stroke: Some(options.border_color.clone()),
                stroke_width: options.border_width,
            }));
            scene.shapes.push(Shape::Text(TextLabel {
                x: x + options.padding,
                y: y + options.label_height + options.padding,
                text: cell.date.day().to_string(),
            }));
            scene.regions.push(HitRegion {
                x,
                y,
                width: options.day_width,
                height: options.day_height,
                target: RegionTarget::Day(cell.date),
            });
            stats.cells += 1;
        }

        for entry in bars {
            let color = categories.resolve(&entry.assignment.category, &options.fallback_color);
            if !color.found {
                stats.category_fallbacks += 1;
            }
            let height = entry.assignment.weight.max(0.0) * options.max_assignment_height;

            for rect in &entry.rects {
                let x = f64::from(rect.start_column) * options.day_width;
                let y = f64::from(rect.row) * options.day_height;
                let width = f64::from(rect.width_columns()) * options.day_width;

                scene.shapes.push(Shape::Rect(DrawRect {
                    x,
                    y,
                    width,
                    height,
                    fill: color.color.to_string(),
                    stroke: None,
                    stroke_width: 0.0,
                }));
                scene.regions.push(HitRegion {
                    x,
                    y,
                    width,
                    height,
                    target: RegionTarget::Assignment(entry.assignment.clone()),
                });
                stats.bars += 1;
            }
        }

        stats
    }
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
