//! Core logic for the assignment planner month view.
//! Lays out a month grid, wraps assignment bars across rows, and turns
//! clicks back into day/assignment notifications.

pub mod calendar;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::category::CategoryRegistry;
pub use calendar::dispatch::{Notification, NotificationKind, SubscriptionId};
pub use calendar::grid::{
    build_grid, days_per_row, DayCell, DayLookup, GridError, MonthGrid, YearMonth,
};
pub use calendar::options::{CalendarOptions, OptionsError};
pub use calendar::scene::{RegionTarget, Scene, Shape};
pub use calendar::span::{decompose, decompose_assignment, SpanError, SpanRect};
pub use calendar::view::{MonthView, RenderReport, SkippedAssignment};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::assignment::{Assignment, AssignmentId, AssignmentValidationError};
pub use model::category::{Category, CategoryId, CategoryValidationError};
pub use repo::record_repo::{
    InsertMode, RecordRepository, RepoError, RepoResult, SqliteRecordRepository,
};
pub use service::planner_service::PlannerService;

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
