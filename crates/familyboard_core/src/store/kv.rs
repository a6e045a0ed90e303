//! Raw key-value backends.
//!
//! Backends move opaque text under string keys and know nothing about
//! records. Every failure surfaces as `StoreError::StorageUnavailable`.

use super::{StoreError, StoreResult};
use crate::db::{open_db, DbResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Blocking key-value storage.
///
/// Implementations are called from the blocking thread pool, never from
/// the async event loop directly.
pub trait KvBackend: Send + Sync {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove_item(&self, key: &str) -> StoreResult<()>;
}

/// Backend over the `kv_entries` table of one SQLite connection.
pub struct SqliteKvBackend {
    conn: Mutex<Connection>,
}

impl SqliteKvBackend {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens (or creates) the database file and wraps it.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        open_db(path).map(Self::new)
    }

    fn conn(&self, key: &str) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::unavailable(key, "connection lock poisoned"))
    }
}

impl KvBackend for SqliteKvBackend {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        self.conn(key)?
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|err| StoreError::unavailable(key, err))
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn(key)?
            .execute(
                "INSERT INTO kv_entries (key, value, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value],
            )
            .map(|_| ())
            .map_err(|err| StoreError::unavailable(key, err))
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.conn(key)?
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])
            .map(|_| ())
            .map_err(|err| StoreError::unavailable(key, err))
    }
}

/// Process-local backend. Contents vanish with the process.
#[derive(Default)]
pub struct MemoryKvBackend {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKvBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self, key: &str) -> StoreResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| StoreError::unavailable(key, "memory store lock poisoned"))
    }
}

impl KvBackend for MemoryKvBackend {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries(key)?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries(key)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.entries(key)?.remove(key);
        Ok(())
    }
}
