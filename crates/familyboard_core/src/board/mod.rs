//! Pure board operations and the startup route decision.
//!
//! # Responsibility
//! - Filter the task list by category.
//! - Flip completion for one task.
//! - Choose the first screen from persisted state.
//!
//! # Invariants
//! - `filter_tasks` and `toggle_completed` are total and side-effect free.
//! - The route decision never propagates storage errors.

mod filter;
mod route;
mod toggle;

pub use filter::{filter_tasks, CategoryFilter, ALL_FILTER, DEFAULT_FILTER_CHIPS};
pub use route::{decide_initial_route, InitialRoute};
pub use toggle::toggle_completed;
