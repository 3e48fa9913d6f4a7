//! Core use-case services.
//!
//! # Responsibility
//! - Keep the state the month view reads, and its storage, in one place.
//! - Keep hosts decoupled from storage details.

pub mod planner_service;
