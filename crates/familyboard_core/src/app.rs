//! App-lifetime context wiring the store, services and color mode.

use crate::appearance::ColorModeContext;
use crate::board::{decide_initial_route, InitialRoute};
use crate::service::roster_service::RosterService;
use crate::service::task_service::TaskService;
use crate::store::{MemoryKvBackend, PersistenceStore, SqliteKvBackend};
use log::error;
use std::path::Path;
use std::sync::Arc;

/// Everything a screen needs, created once at startup.
pub struct FamilyBoard {
    store: PersistenceStore,
    tasks: TaskService,
    roster: RosterService,
    color_mode: ColorModeContext,
}

impl FamilyBoard {
    /// Opens the board database at `db_path`.
    ///
    /// If the file cannot be opened the board runs on an in-memory store for
    /// this session instead of failing.
    pub fn open(db_path: impl AsRef<Path>) -> Self {
        match SqliteKvBackend::open(db_path) {
            Ok(backend) => Self::with_store(PersistenceStore::new(Arc::new(backend))),
            Err(err) => {
                error!(
                    "event=board_open module=app status=fallback error_code=storage_unavailable error={}",
                    err
                );
                Self::in_memory()
            }
        }
    }

    pub fn in_memory() -> Self {
        Self::with_store(PersistenceStore::new(Arc::new(MemoryKvBackend::new())))
    }

    pub fn with_store(store: PersistenceStore) -> Self {
        Self {
            tasks: TaskService::new(store.clone()),
            roster: RosterService::new(store.clone()),
            store,
            color_mode: ColorModeContext::new(),
        }
    }

    pub fn tasks(&self) -> &TaskService {
        &self.tasks
    }

    pub fn roster(&self) -> &RosterService {
        &self.roster
    }

    pub fn color_mode(&self) -> &ColorModeContext {
        &self.color_mode
    }

    pub async fn initial_route(&self) -> InitialRoute {
        decide_initial_route(&self.store).await
    }
}
