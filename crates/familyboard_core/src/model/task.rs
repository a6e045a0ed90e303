//! Task record and edit drafts.
//!
//! # Invariants
//! - `id` is assigned once at creation and survives every edit.
//! - Persisted titles are never blank.
//! - Only `completed` changes in place; edits replace all other fields.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Creation timestamp in epoch milliseconds, used as the stable task key.
pub type TaskId = i64;

/// One entry on the family board.
///
/// Serialized with camelCase keys (`dueDate`) so stored values keep the
/// field names the mobile UI reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub notes: String,
    /// Category `value`. Empty means "no category" and matches no filter.
    #[serde(default)]
    pub category: String,
    /// Person `value`, or `None` when unassigned. May dangle after the
    /// person is removed.
    #[serde(default)]
    pub assignee: Option<String>,
    /// Due date in epoch milliseconds.
    pub due_date: i64,
    #[serde(default)]
    pub completed: bool,
}

/// User-editable task fields.
///
/// Used for both creation and full-replacement edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub notes: String,
    pub category: String,
    pub assignee: Option<String>,
    pub due_date: i64,
}

/// Validation errors for task input and persisted task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    EmptyCategory,
    DuplicateId(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::EmptyCategory => write!(f, "task category cannot be empty"),
            Self::DuplicateId(id) => write!(f, "duplicate task id {id}"),
        }
    }
}

impl Error for TaskValidationError {}

impl TaskDraft {
    /// Checks the fields the add/edit form requires before saving.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if self.category.trim().is_empty() {
            return Err(TaskValidationError::EmptyCategory);
        }
        Ok(())
    }

    fn normalized_assignee(&self) -> Option<String> {
        self.assignee
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }
}

impl Task {
    /// Builds a new, not yet completed task from a validated draft.
    pub fn from_draft(id: TaskId, draft: &TaskDraft) -> Self {
        let mut task = Self {
            id,
            title: String::new(),
            notes: String::new(),
            category: String::new(),
            assignee: None,
            due_date: draft.due_date,
            completed: false,
        };
        task.apply_draft(draft);
        task
    }

    /// Replaces every editable field. `id` and `completed` are kept.
    pub fn apply_draft(&mut self, draft: &TaskDraft) {
        self.title = draft.title.trim().to_string();
        self.notes = draft.notes.clone();
        self.category = draft.category.trim().to_string();
        self.assignee = draft.normalized_assignee();
        self.due_date = draft.due_date;
    }

    /// Checks a record read back from storage.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskDraft, TaskValidationError};

    fn draft(title: &str, category: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            notes: String::new(),
            category: category.to_string(),
            assignee: None,
            due_date: 1_700_000_000_000,
        }
    }

    #[test]
    fn draft_rejects_blank_title_and_category() {
        assert_eq!(
            draft("   ", "chores").validate(),
            Err(TaskValidationError::EmptyTitle)
        );
        assert_eq!(
            draft("Dishes", "").validate(),
            Err(TaskValidationError::EmptyCategory)
        );
        assert!(draft("Dishes", "chores").validate().is_ok());
    }

    #[test]
    fn apply_draft_keeps_id_and_completion() {
        let mut task = Task::from_draft(7, &draft("Dishes", "chores"));
        task.completed = true;

        let mut edit = draft(" Laundry ", "chores");
        edit.assignee = Some("  ".to_string());
        task.apply_draft(&edit);

        assert_eq!(task.id, 7);
        assert!(task.completed);
        assert_eq!(task.title, "Laundry");
        assert_eq!(task.assignee, None);
    }

    #[test]
    fn deserializes_with_defaults_for_optional_fields() {
        let task: Task =
            serde_json::from_str(r#"{"id":1,"title":"Buy milk","dueDate":5}"#).unwrap();
        assert_eq!(task.notes, "");
        assert_eq!(task.category, "");
        assert_eq!(task.assignee, None);
        assert!(!task.completed);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let task = Task::from_draft(1, &draft("Buy milk", "shopping"));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["dueDate"], 1_700_000_000_000_i64);
        assert_eq!(json["completed"], false);
    }
}
