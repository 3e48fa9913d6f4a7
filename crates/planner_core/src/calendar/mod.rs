//! Month view layout, drawing and interaction.
//!
//! # Responsibility
//! - Lay out a month as rows of day cells sized to the container width.
//! - Decompose assignment date ranges into row-wrapped bar rectangles.
//! - Emit draw primitives with click regions and publish click notifications.
//!
//! # Invariants
//! - Each render pass rebuilds grid and scene from scratch.
//! - Core never mutates assignments or categories.

pub mod category;
pub mod dispatch;
pub mod grid;
pub mod options;
pub mod scene;
pub mod span;
pub mod view;
