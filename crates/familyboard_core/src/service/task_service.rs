//! Task use-case service.
//!
//! # Invariants
//! - A new task id is strictly greater than every id already stored.
//! - Edits replace every field except `id` and `completed`.
//! - Drafts are validated before the store is touched.

use crate::board::{filter_tasks, toggle_completed, CategoryFilter};
use crate::model::task::{Task, TaskDraft, TaskId, TaskValidationError};
use crate::store::{PersistenceStore, StoreError, TaskCollection};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskServiceError {
    /// Draft failed input validation.
    Validation(TaskValidationError),
    /// No task with this id exists.
    TaskNotFound(TaskId),
    /// Persistence-layer failure; nothing was written.
    Store(StoreError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::TaskNotFound(_) => None,
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for TaskServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl TaskServiceError {
    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::TaskNotFound(_) => "task_not_found",
            Self::Store(err) => err.code(),
        }
    }
}

/// Task CRUD over the `tasks` collection.
#[derive(Clone)]
pub struct TaskService {
    store: PersistenceStore,
}

impl TaskService {
    pub fn new(store: PersistenceStore) -> Self {
        Self { store }
    }

    /// Returns every stored task, or an empty list when storage fails.
    pub async fn list_tasks(&self) -> Vec<Task> {
        match self.store.load_or_seed::<TaskCollection>().await {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(
                    "event=tasks_load module=service status=fallback error_code={} error={}",
                    err.code(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Returns the tasks passing `filter`, in stored order.
    pub async fn list_filtered(&self, filter: &CategoryFilter) -> Vec<Task> {
        filter_tasks(&self.list_tasks().await, filter)
    }

    pub async fn get_task(&self, id: TaskId) -> Option<Task> {
        self.list_tasks().await.into_iter().find(|task| task.id == id)
    }

    /// Appends a new task built from `draft` and returns it.
    pub async fn create_task(&self, draft: &TaskDraft) -> TaskServiceResult<Task> {
        draft.validate()?;
        let now = now_epoch_ms();
        let result = self
            .store
            .update::<TaskCollection, _, TaskServiceError, _>(|tasks| {
                let task = Task::from_draft(next_task_id(tasks, now), draft);
                tasks.push(task.clone());
                Ok(task)
            })
            .await;
        log_outcome("task_create", &result, |task| task.id);
        result
    }

    /// Replaces the editable fields of task `id` with `draft`.
    pub async fn update_task(&self, id: TaskId, draft: &TaskDraft) -> TaskServiceResult<Task> {
        draft.validate()?;
        let result = self
            .store
            .update::<TaskCollection, _, TaskServiceError, _>(|tasks| {
                let task = tasks
                    .iter_mut()
                    .find(|task| task.id == id)
                    .ok_or(TaskServiceError::TaskNotFound(id))?;
                task.apply_draft(draft);
                Ok(task.clone())
            })
            .await;
        log_outcome("task_update", &result, |task| task.id);
        result
    }

    /// Flips `completed` on task `id` and returns the full updated list.
    ///
    /// Unknown ids leave the list unchanged.
    pub async fn toggle_completed(&self, id: TaskId) -> TaskServiceResult<Vec<Task>> {
        let result = self
            .store
            .update::<TaskCollection, _, TaskServiceError, _>(|tasks| {
                *tasks = toggle_completed(std::mem::take(tasks), id);
                Ok(tasks.clone())
            })
            .await;
        log_outcome("task_toggle", &result, |_| id);
        result
    }

    /// Removes task `id`.
    pub async fn delete_task(&self, id: TaskId) -> TaskServiceResult<()> {
        let result = self
            .store
            .update::<TaskCollection, _, TaskServiceError, _>(|tasks| {
                let before = tasks.len();
                tasks.retain(|task| task.id != id);
                if tasks.len() == before {
                    return Err(TaskServiceError::TaskNotFound(id));
                }
                Ok(())
            })
            .await;
        log_outcome("task_delete", &result, |_| id);
        result
    }
}

/// Next creation id: the current millisecond, bumped past every stored id.
fn next_task_id(tasks: &[Task], now_ms: i64) -> TaskId {
    let max_id = tasks.iter().map(|task| task.id).max();
    match max_id {
        Some(max_id) if max_id >= now_ms => max_id.saturating_add(1),
        _ => now_ms,
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

fn log_outcome<T>(
    event: &str,
    result: &TaskServiceResult<T>,
    task_id: impl FnOnce(&T) -> TaskId,
) {
    match result {
        Ok(value) => info!(
            "event={event} module=service status=ok task_id={}",
            task_id(value)
        ),
        Err(err) if matches!(err, TaskServiceError::Store(_)) => error!(
            "event={event} module=service status=error error_code={} error={}",
            err.code(),
            err
        ),
        Err(err) => warn!(
            "event={event} module=service status=rejected error_code={}",
            err.code()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::next_task_id;
    use crate::model::task::{Task, TaskDraft};

    fn stored(id: i64) -> Task {
        Task::from_draft(
            id,
            &TaskDraft {
                title: "t".to_string(),
                notes: String::new(),
                category: "chores".to_string(),
                assignee: None,
                due_date: 0,
            },
        )
    }

    #[test]
    fn next_id_uses_clock_when_ahead_of_stored_ids() {
        assert_eq!(next_task_id(&[], 1_000), 1_000);
        assert_eq!(next_task_id(&[stored(10)], 1_000), 1_000);
    }

    #[test]
    fn next_id_bumps_past_same_millisecond_or_future_ids() {
        assert_eq!(next_task_id(&[stored(1_000)], 1_000), 1_001);
        assert_eq!(next_task_id(&[stored(5_000), stored(3)], 1_000), 5_001);
    }
}
