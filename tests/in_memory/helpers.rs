//! Shared fixtures for in-memory board integration tests.

use ozikanban::{
    board::{
        domain::{Board, BoardPosition, NewTask, TaskId, TaskMove, TaskPatch, TaskTitle, WorkflowState},
        ports::TaskStore,
        services::{BoardSyncConfig, BoardSyncService},
    },
    session::{Session, SessionContext, SessionUser},
};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

/// Provides an active session.
#[fixture]
pub fn session() -> SessionContext {
    SessionContext::new(Session::start(
        SessionUser::new("u-42", "grace@example.com"),
        &DefaultClock,
    ))
}

/// Creates a sync service over a shared store.
pub fn sync_over<S: TaskStore>(store: &Arc<S>, session: SessionContext) -> BoardSyncService<S> {
    BoardSyncService::new(Arc::clone(store), session, BoardSyncConfig::default())
}

/// Stores a task directly, bypassing the board, and returns its id.
///
/// # Errors
///
/// Returns an error if the title is blank or the store rejects the task.
pub async fn seed_task(
    store: &impl TaskStore,
    title: &str,
    status: WorkflowState,
) -> eyre::Result<TaskId> {
    let record = store
        .create(&NewTask::new(&TaskTitle::new(title)?, None))
        .await?;
    if status != WorkflowState::FIRST {
        store.update(&record.id, &TaskPatch::status(status)).await?;
    }
    Ok(record.id)
}

/// Describes dragging a task between two positions.
pub fn drag(id: &TaskId, from: (WorkflowState, usize), to: (WorkflowState, usize)) -> TaskMove {
    TaskMove::new(
        id.clone(),
        BoardPosition::new(from.0, from.1),
        BoardPosition::new(to.0, to.1),
    )
}

/// Returns the ids held by a column.
pub fn column_ids(board: &Board, state: WorkflowState) -> Vec<TaskId> {
    board
        .column(state)
        .map(|column| column.task_ids().to_vec())
        .unwrap_or_default()
}

/// Asserts that every card sits in the column named by its stored status.
///
/// # Errors
///
/// Returns an error on the first task whose placement disagrees with the
/// store, or when the board holds tasks the store does not.
pub async fn ensure_board_matches_store(
    board: &Board,
    store: &impl TaskStore,
) -> eyre::Result<()> {
    let records = store.list().await?;
    eyre::ensure!(
        board.len() == records.len(),
        "board holds {} tasks, store holds {}",
        board.len(),
        records.len()
    );
    for record in records {
        let placed = board.column_of(&record.id);
        eyre::ensure!(
            placed == record.status.workflow(),
            "task {} placed in {placed:?}, stored as {}",
            record.id,
            record.status
        );
    }
    eyre::ensure!(board.is_consistent(), "board invariants broken");
    Ok(())
}
