use crate::store::{PersistenceStore, TaskCollection};
use log::{info, warn};

/// First screen shown at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialRoute {
    /// Onboarding screen inviting the user to add a first task.
    EmptyState,
    /// Task list.
    TaskList,
}

impl InitialRoute {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmptyState => "empty_state",
            Self::TaskList => "task_list",
        }
    }
}

/// Picks the startup screen from the persisted task collection.
///
/// Any read failure selects `EmptyState`.
pub async fn decide_initial_route(store: &PersistenceStore) -> InitialRoute {
    let route = match store.load::<TaskCollection>().await {
        Ok(Some(tasks)) if !tasks.is_empty() => InitialRoute::TaskList,
        Ok(_) => InitialRoute::EmptyState,
        Err(err) => {
            warn!(
                "event=initial_route module=board status=fallback error_code={} error={}",
                err.code(),
                err
            );
            InitialRoute::EmptyState
        }
    };
    info!(
        "event=initial_route module=board status=ok route={}",
        route.as_str()
    );
    route
}
