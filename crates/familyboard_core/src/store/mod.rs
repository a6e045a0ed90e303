//! Whole-collection persistence for the board.
//!
//! # Responsibility
//! - Address the three collections by fixed keys (`tasks`, `people`,
//!   `categories`).
//! - Parse stored text into typed records and reject anything that does not
//!   match the record shape or its invariants.
//!
//! # Invariants
//! - Reads and writes always cover a whole collection; there is no partial
//!   update.
//! - At most one operation per key is in flight; different keys are
//!   independent.
//! - Nothing is written unless it passes the collection check.

use crate::model::roster::{
    default_categories, default_people, validate_categories, validate_entries, LabeledEntry,
};
use crate::model::task::{Task, TaskValidationError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod kv;
mod persistence;

pub use kv::{KvBackend, MemoryKvBackend, SqliteKvBackend};
pub use persistence::PersistenceStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failures. Callers recover from both kinds locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Device storage could not be read or written.
    StorageUnavailable { key: String, detail: String },
    /// Stored text does not parse into a valid collection.
    MalformedRecord { key: String, detail: String },
}

impl StoreError {
    pub fn unavailable(key: &str, detail: impl Display) -> Self {
        Self::StorageUnavailable {
            key: key.to_string(),
            detail: detail.to_string(),
        }
    }

    pub fn malformed(key: &str, detail: impl Display) -> Self {
        Self::MalformedRecord {
            key: key.to_string(),
            detail: detail.to_string(),
        }
    }

    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StorageUnavailable { .. } => "storage_unavailable",
            Self::MalformedRecord { .. } => "malformed_record",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable { key, detail } => {
                write!(f, "storage unavailable for `{key}`: {detail}")
            }
            Self::MalformedRecord { key, detail } => {
                write!(f, "malformed record in `{key}`: {detail}")
            }
        }
    }
}

impl Error for StoreError {}

/// Fixed storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    Tasks,
    People,
    Categories,
}

impl CollectionKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::People => "people",
            Self::Categories => "categories",
        }
    }
}

impl Display for CollectionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binds a storage key to its record type, seed, and schema check.
pub trait Collection: 'static {
    const KEY: CollectionKey;
    type Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Value persisted the first time the key is read and found absent.
    /// `None` means the collection starts empty and is not written.
    fn seed() -> Option<Vec<Self::Record>>;

    /// Checks invariants that span the whole collection.
    fn check(records: &[Self::Record]) -> Result<(), String>;
}

/// The `tasks` collection. Not seeded.
pub struct TaskCollection;

/// The `people` collection. Seeded with three family members.
pub struct PeopleCollection;

/// The `categories` collection. Seeded with chores, shopping and reminders.
pub struct CategoryCollection;

impl Collection for TaskCollection {
    const KEY: CollectionKey = CollectionKey::Tasks;
    type Record = Task;

    fn seed() -> Option<Vec<Task>> {
        None
    }

    fn check(records: &[Task]) -> Result<(), String> {
        let mut ids = HashSet::with_capacity(records.len());
        for task in records {
            task.validate()
                .map_err(|err| format!("task {}: {err}", task.id))?;
            if !ids.insert(task.id) {
                return Err(TaskValidationError::DuplicateId(task.id).to_string());
            }
        }
        Ok(())
    }
}

impl Collection for PeopleCollection {
    const KEY: CollectionKey = CollectionKey::People;
    type Record = LabeledEntry;

    fn seed() -> Option<Vec<LabeledEntry>> {
        Some(default_people())
    }

    fn check(records: &[LabeledEntry]) -> Result<(), String> {
        validate_entries(records).map_err(|err| err.to_string())
    }
}

impl Collection for CategoryCollection {
    const KEY: CollectionKey = CollectionKey::Categories;
    type Record = LabeledEntry;

    fn seed() -> Option<Vec<LabeledEntry>> {
        Some(default_categories())
    }

    fn check(records: &[LabeledEntry]) -> Result<(), String> {
        validate_categories(records).map_err(|err| err.to_string())
    }
}

/// Parses and checks stored text for collection `C`.
pub(crate) fn decode<C: Collection>(text: &str) -> StoreResult<Vec<C::Record>> {
    let key = C::KEY.as_str();
    let records: Vec<C::Record> =
        serde_json::from_str(text).map_err(|err| StoreError::malformed(key, err))?;
    C::check(&records).map_err(|detail| StoreError::malformed(key, detail))?;
    Ok(records)
}

/// Checks and serializes records for collection `C`.
pub(crate) fn encode<C: Collection>(records: &[C::Record]) -> StoreResult<String> {
    let key = C::KEY.as_str();
    C::check(records).map_err(|detail| StoreError::malformed(key, detail))?;
    serde_json::to_string(records).map_err(|err| StoreError::malformed(key, err))
}
