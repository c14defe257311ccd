//! Domain models for the task tracker.
//!
//! # Core Concepts
//!
//! - [`Task`]: the single stored entity. Its raw `title` may embed macro
//!   tokens (`!1`..`!4`, `!before dd.mm.yyyy`) that feed `priority` and
//!   `deadline` when those are not supplied explicitly.
//! - [`Priority`] and [`TaskStatus`]: closed classifications stored as
//!   snake_case text.
//! - [`Patch`]: tri-state field for partial updates, used where "absent"
//!   and "explicitly null" mean different things.

pub mod deadline;
mod patch;
mod task;

pub use patch::*;
pub use task::*;
