//! Board data contract shared by every screen.
//!
//! # Responsibility
//! - Define the record shapes persisted under the `tasks`, `people` and
//!   `categories` keys.
//! - Own record-level invariants checked at the storage boundary.
//!
//! # Invariants
//! - Task ids are unique within the task collection and never reassigned.
//! - Person/Category `value` is unique within its collection.

pub mod roster;
pub mod task;
