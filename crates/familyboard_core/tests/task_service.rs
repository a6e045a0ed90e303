use familyboard_core::{
    CategoryFilter, FamilyBoard, KvBackend, MemoryKvBackend, PersistenceStore, StoreError,
    StoreResult, TaskDraft, TaskService, TaskServiceError, TaskValidationError,
};
use std::collections::HashSet;
use std::sync::Arc;

fn draft(title: &str, category: &str) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        notes: String::new(),
        category: category.to_string(),
        assignee: None,
        due_date: 1_700_000_000_000,
    }
}

fn service() -> TaskService {
    TaskService::new(PersistenceStore::in_memory())
}

#[tokio::test]
async fn create_task_appends_with_defaults() {
    let service = service();
    let mut input = draft("  Buy milk ", "shopping");
    input.assignee = Some("👩 Mom".to_string());

    let created = service.create_task(&input).await.unwrap();
    assert_eq!(created.title, "Buy milk");
    assert_eq!(created.notes, "");
    assert_eq!(created.assignee.as_deref(), Some("👩 Mom"));
    assert!(!created.completed);

    assert_eq!(service.list_tasks().await, vec![created]);
}

#[tokio::test]
async fn rapid_creations_get_distinct_ids() {
    let service = service();
    let mut ids = HashSet::new();
    for index in 0..20 {
        let created = service
            .create_task(&draft(&format!("task {index}"), "chores"))
            .await
            .unwrap();
        assert!(ids.insert(created.id), "duplicate id {}", created.id);
    }
    assert_eq!(service.list_tasks().await.len(), 20);
}

#[tokio::test]
async fn create_task_rejects_blank_title_without_writing() {
    let store = PersistenceStore::in_memory();
    let service = TaskService::new(store.clone());

    let err = service.create_task(&draft("   ", "chores")).await.unwrap_err();
    assert_eq!(
        err,
        TaskServiceError::Validation(TaskValidationError::EmptyTitle)
    );
    assert_eq!(
        store
            .load::<familyboard_core::TaskCollection>()
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
async fn update_task_replaces_fields_and_preserves_id() {
    let service = service();
    let original = service.create_task(&draft("Dishes", "chores")).await.unwrap();
    service.toggle_completed(original.id).await.unwrap();

    let mut edit = draft("Groceries", "shopping");
    edit.notes = "eggs, bread".to_string();
    edit.assignee = Some("🧒 Kids".to_string());
    edit.due_date = 1_800_000_000_000;
    let updated = service.update_task(original.id, &edit).await.unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.title, "Groceries");
    assert_eq!(updated.category, "shopping");
    assert_eq!(updated.notes, "eggs, bread");
    assert_eq!(updated.due_date, 1_800_000_000_000);
    assert!(updated.completed);
    assert_eq!(service.get_task(original.id).await, Some(updated));
}

#[tokio::test]
async fn update_unknown_task_returns_not_found() {
    let service = service();
    let err = service
        .update_task(42, &draft("Dishes", "chores"))
        .await
        .unwrap_err();
    assert_eq!(err, TaskServiceError::TaskNotFound(42));
}

#[tokio::test]
async fn toggle_completed_flips_and_persists() {
    let service = service();
    let first = service.create_task(&draft("Dishes", "chores")).await.unwrap();
    let second = service.create_task(&draft("Milk", "shopping")).await.unwrap();

    let toggled = service.toggle_completed(second.id).await.unwrap();
    assert!(!toggled[0].completed);
    assert!(toggled[1].completed);
    assert_eq!(service.list_tasks().await, toggled);

    let unchanged = service.toggle_completed(-1).await.unwrap();
    assert_eq!(unchanged, toggled);

    let back = service.toggle_completed(second.id).await.unwrap();
    assert!(back.iter().all(|task| !task.completed));
    assert_eq!(back[0].id, first.id);
}

#[tokio::test]
async fn list_filtered_uses_category_case_insensitively() {
    let service = service();
    service.create_task(&draft("Dishes", "chores")).await.unwrap();
    service.create_task(&draft("Milk", "shopping")).await.unwrap();
    service.create_task(&draft("Eggs", "Shopping")).await.unwrap();

    let shopping = service
        .list_filtered(&CategoryFilter::parse("Shopping"))
        .await;
    assert_eq!(
        shopping.iter().map(|task| task.title.as_str()).collect::<Vec<_>>(),
        vec!["Milk", "Eggs"]
    );
    assert_eq!(service.list_filtered(&CategoryFilter::All).await.len(), 3);
}

#[tokio::test]
async fn delete_task_removes_only_the_target() {
    let service = service();
    let keep = service.create_task(&draft("Dishes", "chores")).await.unwrap();
    let gone = service.create_task(&draft("Milk", "shopping")).await.unwrap();

    service.delete_task(gone.id).await.unwrap();
    assert_eq!(service.list_tasks().await, vec![keep]);
    assert_eq!(
        service.delete_task(gone.id).await.unwrap_err(),
        TaskServiceError::TaskNotFound(gone.id)
    );
}

#[tokio::test]
async fn malformed_tasks_fall_back_to_empty_list_and_block_writes() {
    let backend = Arc::new(MemoryKvBackend::new());
    backend.set_item("tasks", "{broken").unwrap();
    let service = TaskService::new(PersistenceStore::new(backend.clone()));

    assert!(service.list_tasks().await.is_empty());

    let err = service
        .create_task(&draft("Dishes", "chores"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TaskServiceError::Store(StoreError::MalformedRecord { .. })
    ));
    assert_eq!(backend.get_item("tasks").unwrap().as_deref(), Some("{broken"));
}

struct UnavailableBackend;

impl KvBackend for UnavailableBackend {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::unavailable(key, "permission denied"))
    }

    fn set_item(&self, key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::unavailable(key, "permission denied"))
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        Err(StoreError::unavailable(key, "permission denied"))
    }
}

#[tokio::test]
async fn unavailable_storage_is_not_fatal() {
    let board = FamilyBoard::with_store(PersistenceStore::new(Arc::new(UnavailableBackend)));

    assert!(board.tasks().list_tasks().await.is_empty());
    let err = board
        .tasks()
        .create_task(&draft("Dishes", "chores"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TaskServiceError::Store(StoreError::StorageUnavailable { .. })
    ));
}
