//! Domain entities consumed by the month view.
//!
//! # Responsibility
//! - Define assignment and category records owned by the state container.
//! - Describe how each record maps onto storage columns.
//!
//! # Invariants
//! - Every record is identified by a stable uuid.
//! - The calendar core reads these records and never mutates them.

pub mod assignment;
pub mod category;
pub mod record;
