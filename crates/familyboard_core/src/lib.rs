//! Core data contract and persistence for the family task board.
//! This crate is the single source of truth for board invariants.

pub mod app;
pub mod appearance;
pub mod board;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use app::FamilyBoard;
pub use appearance::{ColorMode, ColorModeContext};
pub use board::{
    decide_initial_route, filter_tasks, toggle_completed, CategoryFilter, InitialRoute,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::roster::{assignee_label, Category, LabeledEntry, Person};
pub use model::task::{Task, TaskDraft, TaskId, TaskValidationError};
pub use service::roster_service::{RosterError, RosterResult, RosterService};
pub use service::task_service::{TaskService, TaskServiceError, TaskServiceResult};
pub use store::{
    CategoryCollection, Collection, CollectionKey, KvBackend, MemoryKvBackend, PeopleCollection,
    PersistenceStore, SqliteKvBackend, StoreError, StoreResult, TaskCollection,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
