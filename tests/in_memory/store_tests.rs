//! Contract tests for the in-memory task store.

use ozikanban::board::{
    adapters::memory::InMemoryTaskStore,
    domain::{NewTask, Priority, TaskId, TaskPatch, TaskStatus, TaskTitle, WorkflowState},
    ports::{TaskStore, TaskStoreError},
};
use rstest::{fixture, rstest};

#[fixture]
fn store() -> InMemoryTaskStore {
    InMemoryTaskStore::new()
}

fn draft(title: &str) -> NewTask {
    NewTask::new(&TaskTitle::new(title).expect("valid title"), Some(Priority::Medium))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_assigns_id_timestamps_and_first_status(store: InMemoryTaskStore) {
    let record = store.create(&draft("Plan sprint")).await.expect("create succeeds");

    assert_eq!(record.status, TaskStatus::Workflow(WorkflowState::Todo));
    assert_eq!(record.tag, Some(Priority::Medium));
    assert_eq!(record.created_at, record.updated_at);
    assert!(!record.id.as_str().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_rejects_blank_title(store: InMemoryTaskStore) {
    let blank = NewTask {
        title: "  ".to_owned(),
        tag: None,
        status: WorkflowState::Todo,
    };

    let result = store.create(&blank).await;

    assert!(matches!(result, Err(TaskStoreError::Validation(_))));
    assert!(store.list().await.expect("list succeeds").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_preserves_insertion_order(store: InMemoryTaskStore) {
    for title in ["first", "second", "third"] {
        store.create(&draft(title)).await.expect("create succeeds");
    }

    let titles: Vec<String> = store
        .list()
        .await
        .expect("list succeeds")
        .into_iter()
        .map(|record| record.title.as_str().to_owned())
        .collect();

    assert_eq!(titles, vec!["first", "second", "third"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_applies_partial_fields(store: InMemoryTaskStore) {
    let created = store.create(&draft("Draft")).await.expect("create succeeds");

    let updated = store
        .update(&created.id, &TaskPatch::status(WorkflowState::Done))
        .await
        .expect("update succeeds");

    assert_eq!(updated.status, TaskStatus::Workflow(WorkflowState::Done));
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.tag, created.tag);
    assert!(updated.updated_at >= created.updated_at);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_unknown_id_is_not_found(store: InMemoryTaskStore) {
    let result = store
        .update(&TaskId::from("missing"), &TaskPatch::status(WorkflowState::Done))
        .await;

    assert!(matches!(result, Err(TaskStoreError::NotFound(id)) if id.as_str() == "missing"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_delete_of_same_id_fails(store: InMemoryTaskStore) {
    let created = store.create(&draft("Ephemeral")).await.expect("create succeeds");

    let deleted = store.delete(&created.id).await.expect("first delete succeeds");
    let again = store.delete(&created.id).await;

    assert_eq!(deleted, created.id);
    assert!(matches!(again, Err(TaskStoreError::NotFound(_))));
}
