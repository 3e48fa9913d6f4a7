//! Month view render pass and click routing.
//!
//! # Responsibility
//! - Run grid build, span decomposition and scene emission for one month.
//! - Route clicks on the current scene to subscribed listeners.
//!
//! # Invariants
//! - Every render fully replaces the previous grid and scene.
//! - An assignment that cannot be placed is skipped, never fatal to the pass.
//! - A click publishes at most one notification.

use crate::calendar::category::CategoryRegistry;
use crate::calendar::dispatch::{
    InteractionDispatcher, Notification, NotificationKind, SubscriptionId,
};
use crate::calendar::grid::{build_grid, DayLookup, GridError, MonthGrid, YearMonth};
use crate::calendar::options::{CalendarOptions, OptionsError};
use crate::calendar::scene::{AssignmentBars, RegionTarget, Scene, SceneEmitter};
use crate::calendar::span::{decompose_assignment, SpanError, SpanRect};
use crate::model::assignment::{Assignment, AssignmentId};
use crate::model::category::Category;
use chrono::NaiveDate;
use log::{info, warn};
use std::time::Instant;

/// An assignment left out of the scene and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedAssignment {
    pub assignment_id: AssignmentId,
    pub error: SpanError,
}

/// Summary of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub month: YearMonth,
    pub days_per_row: u32,
    pub rows: u32,
    pub cells: usize,
    pub bars: usize,
    pub category_fallbacks: usize,
    pub skipped: Vec<SkippedAssignment>,
}

/// Stateful month view: owns the day lookup, current scene and listeners.
#[derive(Debug)]
pub struct MonthView {
    options: CalendarOptions,
    lookup: DayLookup,
    grid: Option<MonthGrid>,
    scene: Scene,
    dispatcher: InteractionDispatcher,
}

impl MonthView {
    pub fn new(options: CalendarOptions) -> Result<Self, OptionsError> {
        options.validate()?;
        Ok(Self {
            options,
            lookup: DayLookup::new(),
            grid: None,
            scene: Scene::new(),
            dispatcher: InteractionDispatcher::new(),
        })
    }

    /// Renders `year`/`month` (1-based) into the scene.
    ///
    /// Assignments whose range is reversed or leaves the rendered month are
    /// skipped and listed in the report.
    ///
    /// # Errors
    /// - `GridError` when `year`/`month` is not a valid calendar month; the
    ///   previous scene is left untouched.
    pub fn render(
        &mut self,
        year: i32,
        month: u32,
        container_width_px: f64,
        assignments: &[Assignment],
        categories: &[Category],
        today: NaiveDate,
    ) -> Result<RenderReport, GridError> {
        let started_at = Instant::now();
        let month = YearMonth::new(year, month)?;
        let grid = build_grid(
            month,
            container_width_px,
            self.options.day_width,
            &mut self.lookup,
        );

        let mut bars = Vec::with_capacity(assignments.len());
        let mut skipped = Vec::new();
        for assignment in assignments {
            match place(month, assignment, &self.lookup, grid.days_per_row) {
                Ok(rects) => bars.push(AssignmentBars { assignment, rects }),
                Err(error) => {
                    warn!(
                        "event=span_skipped module=calendar status=skip month={} assignment_id={} error={}",
                        month, assignment.id, error
                    );
                    skipped.push(SkippedAssignment {
                        assignment_id: assignment.id,
                        error,
                    });
                }
            }
        }

        let registry = CategoryRegistry::from_categories(categories);
        let stats = SceneEmitter::new(&self.options).emit(
            &mut self.scene,
            &grid,
            &bars,
            &registry,
            today,
        );

        let report = RenderReport {
            month,
            days_per_row: grid.days_per_row,
            rows: grid.row_count(),
            cells: stats.cells,
            bars: stats.bars,
            category_fallbacks: stats.category_fallbacks,
            skipped,
        };
        info!(
            "event=render_month module=calendar status=ok month={} days_per_row={} cells={} bars={} skipped={} duration_ms={}",
            month,
            report.days_per_row,
            report.cells,
            report.bars,
            report.skipped.len(),
            started_at.elapsed().as_millis()
        );
        self.grid = Some(grid);
        Ok(report)
    }

    /// Hit-tests the current scene and publishes the matching notification.
    ///
    /// Returns `None` when the point misses every region.
    pub fn click(&mut self, x: f64, y: f64) -> Option<Notification> {
        let notification = match self.scene.hit_test(x, y)? {
            RegionTarget::Day(date) => Notification::DayActivated(*date),
            RegionTarget::Assignment(assignment) => {
                Notification::AssignmentActivated(assignment.clone())
            }
        };
        self.dispatcher.publish(&notification);
        Some(notification)
    }

    pub fn subscribe(
        &mut self,
        kind: NotificationKind,
        handler: impl FnMut(&Notification) + 'static,
    ) -> SubscriptionId {
        self.dispatcher.subscribe(kind, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.dispatcher.unsubscribe(id)
    }

    pub fn options(&self) -> &CalendarOptions {
        &self.options
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Grid of the last successful render.
    pub fn grid(&self) -> Option<&MonthGrid> {
        self.grid.as_ref()
    }

    pub fn lookup(&self) -> &DayLookup {
        &self.lookup
    }
}

fn place(
    month: YearMonth,
    assignment: &Assignment,
    lookup: &DayLookup,
    days_per_row: u32,
) -> Result<Vec<SpanRect>, SpanError> {
    // The lookup keeps earlier months; only this month's cells may be used.
    for date in [assignment.start_date, assignment.end_date] {
        if !month.contains(date) {
            return Err(SpanError::Unresolved(date));
        }
    }
    decompose_assignment(assignment, lookup, days_per_row)
}
