//! Repository layer over the planner database.
//!
//! # Responsibility
//! - Define the storage contract the state container relies on.
//! - Keep SQLite query details out of services and the calendar core.
//!
//! # Invariants
//! - Repository writes validate records before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `AlreadyExists`) in
//!   addition to DB transport errors.

pub mod record_repo;
