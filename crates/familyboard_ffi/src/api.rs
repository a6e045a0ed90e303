//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose board use-cases to Dart via FRB as sync calls.
//! - Own the process-wide board context and the runtime that drives it.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Storage failures degrade to empty/default lists or a failed response,
//!   never to an error thrown into Dart.

use familyboard_core::board::DEFAULT_FILTER_CHIPS;
use familyboard_core::model::roster::MEMBER_PICTOGRAPHS;
use familyboard_core::{
    assignee_label, core_version as core_version_inner, default_log_level,
    init_logging as init_logging_inner,
    ping as ping_inner, CategoryFilter, ColorMode, FamilyBoard, LabeledEntry, Person, Task,
    TaskDraft, TaskId,
};
use log::{error, info, warn};
use std::future::Future;
use std::path::PathBuf;
use std::sync::OnceLock;
use tokio::runtime::Runtime;

const DEFAULT_DB_FILE_NAME: &str = "familyboard.sqlite3";

static RUNTIME: OnceLock<Option<Runtime>> = OnceLock::new();
static BOARD: OnceLock<(PathBuf, FamilyBoard)> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: `trace|debug|info|warn|error` (case-insensitive); blank selects
///   the build default (`debug` or `info`).
/// - `log_dir`: absolute directory for rolling log files.
/// - Idempotent for the same inputs; returns an error message otherwise.
/// - Returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = match level.trim() {
        "" => default_log_level(),
        explicit => explicit,
    };
    match init_logging_inner(level, log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Selects the board database file. Call once at startup before any other
/// board function.
///
/// # FFI contract
/// - Repeating the call with the same path is a no-op.
/// - A different path after the board is open returns an error message.
/// - An unopenable file still yields a working, session-only board.
/// - Returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn init_store(db_path: String) -> String {
    let requested = PathBuf::from(db_path.trim());
    if requested.as_os_str().is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let (active, _) = BOARD.get_or_init(|| open_board(requested.clone()));
    if *active != requested {
        return format!(
            "board store already open at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        );
    }
    String::new()
}

/// Task row as rendered by the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub title: String,
    pub notes: String,
    pub category: String,
    /// Stored person value, if any.
    pub assignee: Option<String>,
    /// Person label, or the raw stored value when that person was removed.
    pub assignee_label: Option<String>,
    pub due_epoch_ms: i64,
    pub completed: bool,
}

/// `{ label, value }` pair for people and categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryItem {
    pub label: String,
    pub value: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Affected task id, for task operations.
    pub task_id: Option<i64>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, task_id: Option<TaskId>) -> Self {
        Self {
            ok: true,
            task_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// Startup screen: `task_list` when tasks exist, otherwise `empty_state`.
#[flutter_rust_bridge::frb(sync)]
pub fn initial_route() -> String {
    with_board(
        |board| async move { board.initial_route().await.as_str().to_string() },
        || "empty_state".to_string(),
    )
}

/// Filter chips for the task list header.
#[flutter_rust_bridge::frb(sync)]
pub fn filter_chips() -> Vec<String> {
    DEFAULT_FILTER_CHIPS.iter().map(|chip| chip.to_string()).collect()
}

/// Pictographs offered when adding a family member.
#[flutter_rust_bridge::frb(sync)]
pub fn member_pictographs() -> Vec<String> {
    MEMBER_PICTOGRAPHS
        .iter()
        .map(|pictograph| pictograph.to_string())
        .collect()
}

/// Lists tasks passing `filter` (`"All"` or a category, case-insensitive).
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list(filter: String) -> Vec<TaskItem> {
    let filter = CategoryFilter::parse(filter.trim());
    with_board(
        |board| async move {
            let tasks = board.tasks().list_filtered(&filter).await;
            let people = board.roster().list_people().await;
            tasks
                .iter()
                .map(|task| to_task_item(task, &people))
                .collect()
        },
        Vec::new,
    )
}

/// Creates a task. `due_epoch_ms` is the picked due date in epoch ms.
#[flutter_rust_bridge::frb(sync)]
pub fn task_create(
    title: String,
    notes: String,
    category: String,
    assignee: Option<String>,
    due_epoch_ms: i64,
) -> ActionResponse {
    let draft = TaskDraft {
        title,
        notes,
        category,
        assignee,
        due_date: due_epoch_ms,
    };
    with_board(
        |board| async move {
            match board.tasks().create_task(&draft).await {
                Ok(task) => ActionResponse::success("Task created.", Some(task.id)),
                Err(err) => ActionResponse::failure(format!("task_create failed: {err}")),
            }
        },
        unavailable,
    )
}

/// Replaces every editable field of task `id`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_update(
    id: i64,
    title: String,
    notes: String,
    category: String,
    assignee: Option<String>,
    due_epoch_ms: i64,
) -> ActionResponse {
    let draft = TaskDraft {
        title,
        notes,
        category,
        assignee,
        due_date: due_epoch_ms,
    };
    with_board(
        |board| async move {
            match board.tasks().update_task(id, &draft).await {
                Ok(task) => ActionResponse::success("Task updated.", Some(task.id)),
                Err(err) => ActionResponse::failure(format!("task_update failed: {err}")),
            }
        },
        unavailable,
    )
}

/// Flips completion on task `id`. Unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: i64) -> ActionResponse {
    with_board(
        |board| async move {
            match board.tasks().toggle_completed(id).await {
                Ok(_) => ActionResponse::success("Task toggled.", Some(id)),
                Err(err) => ActionResponse::failure(format!("task_toggle failed: {err}")),
            }
        },
        unavailable,
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: i64) -> ActionResponse {
    with_board(
        |board| async move {
            match board.tasks().delete_task(id).await {
                Ok(()) => ActionResponse::success("Task deleted.", Some(id)),
                Err(err) => ActionResponse::failure(format!("task_delete failed: {err}")),
            }
        },
        unavailable,
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn people_list() -> Vec<EntryItem> {
    with_board(
        |board| async move { to_entry_items(board.roster().list_people().await) },
        Vec::new,
    )
}

/// Adds a family member shown as `"<pictograph> <name>"`.
#[flutter_rust_bridge::frb(sync)]
pub fn person_add(pictograph: String, name: String) -> ActionResponse {
    with_board(
        |board| async move {
            match board.roster().add_person(&pictograph, &name).await {
                Ok(_) => ActionResponse::success("Family member added.", None),
                Err(err) => ActionResponse::failure(format!("person_add failed: {err}")),
            }
        },
        unavailable,
    )
}

/// Removes a family member. Tasks assigned to it are left untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn person_remove(value: String) -> ActionResponse {
    with_board(
        |board| async move {
            match board.roster().remove_person(&value).await {
                Ok(_) => ActionResponse::success("Family member removed.", None),
                Err(err) => ActionResponse::failure(format!("person_remove failed: {err}")),
            }
        },
        unavailable,
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn categories_list() -> Vec<EntryItem> {
    with_board(
        |board| async move { to_entry_items(board.roster().list_categories().await) },
        Vec::new,
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn category_add(label: String, value: String) -> ActionResponse {
    with_board(
        |board| async move {
            match board.roster().add_category(&label, &value).await {
                Ok(_) => ActionResponse::success("Category added.", None),
                Err(err) => ActionResponse::failure(format!("category_add failed: {err}")),
            }
        },
        unavailable,
    )
}

/// Removes a category. Tasks keep their stored category value.
#[flutter_rust_bridge::frb(sync)]
pub fn category_remove(value: String) -> ActionResponse {
    with_board(
        |board| async move {
            match board.roster().remove_category(&value).await {
                Ok(_) => ActionResponse::success("Category removed.", None),
                Err(err) => ActionResponse::failure(format!("category_remove failed: {err}")),
            }
        },
        unavailable,
    )
}

/// Current session color mode.
#[flutter_rust_bridge::frb(sync)]
pub fn color_mode_is_dark() -> bool {
    board().color_mode().is_dark()
}

/// Flips light/dark and returns whether dark mode is now active.
#[flutter_rust_bridge::frb(sync)]
pub fn color_mode_toggle() -> bool {
    board().color_mode().toggle() == ColorMode::Dark
}

fn open_board(path: PathBuf) -> (PathBuf, FamilyBoard) {
    info!("event=board_init module=ffi status=start");
    let board = FamilyBoard::open(&path);
    (path, board)
}

fn board() -> &'static FamilyBoard {
    let (_, board) = BOARD.get_or_init(|| {
        warn!("event=board_init module=ffi status=default_path reason=init_store_not_called");
        open_board(default_db_path())
    });
    board
}

fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

fn runtime() -> Option<&'static Runtime> {
    RUNTIME
        .get_or_init(|| {
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name("familyboard-core")
                .enable_all()
                .build()
                .map_err(|err| {
                    error!(
                        "event=runtime_init module=ffi status=error error_code=runtime_build_failed error={err}"
                    );
                })
                .ok()
        })
        .as_ref()
}

fn with_board<T, Fut>(
    op: impl FnOnce(&'static FamilyBoard) -> Fut,
    fallback: impl FnOnce() -> T,
) -> T
where
    Fut: Future<Output = T>,
{
    match runtime() {
        Some(runtime) => runtime.block_on(op(board())),
        None => fallback(),
    }
}

fn unavailable() -> ActionResponse {
    ActionResponse::failure("board runtime unavailable")
}

fn to_task_item(task: &Task, people: &[Person]) -> TaskItem {
    TaskItem {
        id: task.id,
        title: task.title.clone(),
        notes: task.notes.clone(),
        category: task.category.clone(),
        assignee: task.assignee.clone(),
        assignee_label: assignee_label(task.assignee.as_deref(), people),
        due_epoch_ms: task.due_date,
        completed: task.completed,
    }
}

fn to_entry_items(entries: Vec<LabeledEntry>) -> Vec<EntryItem> {
    entries
        .into_iter()
        .map(|entry| EntryItem {
            label: entry.label,
            value: entry.value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        categories_list, category_add, category_remove, color_mode_is_dark, color_mode_toggle,
        core_version, filter_chips, init_logging, init_store, initial_route, member_pictographs,
        people_list, person_add, person_remove, ping, task_create, task_delete, task_toggle,
        task_update, tasks_list,
    };
    use std::sync::Once;
    use std::time::{SystemTime, UNIX_EPOCH};

    static INIT: Once = Once::new();

    fn setup() {
        INIT.call_once(|| {
            let path = std::env::temp_dir().join(format!(
                "familyboard-ffi-{}-{}.sqlite3",
                std::process::id(),
                unique_token("db")
            ));
            assert_eq!(init_store(path.display().to_string()), "");
        });
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn init_store_rejects_switching_paths() {
        setup();
        assert!(!init_store("/tmp/another-board.sqlite3".to_string()).is_empty());
        assert!(!init_store("  ".to_string()).is_empty());
    }

    #[test]
    fn default_db_path_lives_in_temp_dir() {
        let path = super::default_db_path();
        assert!(path.starts_with(std::env::temp_dir()));
        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("familyboard.sqlite3")
        );
    }

    #[test]
    fn filter_chips_start_with_all() {
        assert_eq!(filter_chips().first().map(String::as_str), Some("All"));
    }

    #[test]
    fn task_lifecycle_roundtrip() {
        setup();
        let category = unique_token("cat");
        let created = task_create(
            "Buy milk".to_string(),
            String::new(),
            category.clone(),
            Some("👩 Mom".to_string()),
            1_700_000_000_000,
        );
        assert!(created.ok, "{}", created.message);
        let id = created.task_id.expect("create should return task id");
        assert_eq!(initial_route(), "task_list");

        let listed = tasks_list(category.to_uppercase());
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].assignee_label.as_deref(), Some("👩 Mom"));
        assert!(!listed[0].completed);

        assert!(task_toggle(id).ok);
        assert!(tasks_list(category.clone())[0].completed);

        let updated = task_update(
            id,
            "Buy oat milk".to_string(),
            "two cartons".to_string(),
            category.clone(),
            None,
            1_700_000_100_000,
        );
        assert!(updated.ok, "{}", updated.message);
        let listed = tasks_list(category.clone());
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].title, "Buy oat milk");
        assert!(listed[0].completed);

        assert!(task_delete(id).ok);
        assert!(tasks_list(category).is_empty());
    }

    #[test]
    fn task_create_rejects_blank_title() {
        setup();
        let response = task_create(
            "  ".to_string(),
            String::new(),
            "chores".to_string(),
            None,
            0,
        );
        assert!(!response.ok);
        assert!(response.message.contains("title"));
    }

    #[test]
    fn people_and_categories_are_seeded_and_editable() {
        setup();
        assert!(categories_list().iter().any(|entry| entry.value == "chores"));

        let name = unique_token("member");
        assert!(person_add("🐶".to_string(), name.clone()).ok);
        let value = format!("🐶 {name}");
        assert!(people_list().iter().any(|entry| entry.value == value));

        assert!(person_remove(value.clone()).ok);
        assert!(!person_remove(value).ok);
    }

    #[test]
    fn blank_level_falls_back_to_build_default_and_still_validates_dir() {
        let error = init_logging("  ".to_string(), "relative/logs".to_string());
        assert!(error.contains("absolute"), "{error}");
    }

    #[test]
    fn member_pictographs_gate_person_add() {
        setup();
        let offered = member_pictographs();
        assert!(offered.iter().any(|pictograph| pictograph == "🐱"));
        assert!(!person_add("🦖".to_string(), unique_token("rex")).ok);
    }

    #[test]
    fn categories_can_be_added_and_removed() {
        setup();
        let value = unique_token("homework");
        assert!(category_add("📚 Homework".to_string(), value.clone()).ok);
        assert!(categories_list().iter().any(|entry| entry.value == value));

        assert!(category_remove(value.clone()).ok);
        assert!(categories_list().iter().all(|entry| entry.value != value));
        assert!(!category_remove(value).ok);
    }

    #[test]
    fn color_mode_toggles_in_memory() {
        setup();
        let before = color_mode_is_dark();
        assert_eq!(color_mode_toggle(), !before);
        assert_eq!(color_mode_toggle(), before);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
