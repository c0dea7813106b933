//! Optimistic synchronization of the board with a task store.
//!
//! Every operation publishes its local result first and talks to the store
//! afterwards. Remote calls for the same task are serialized in submission
//! order, and confirmations are applied only when the board has not changed
//! since the request was issued.

use super::{BoardSyncConfig, RetryPolicy};
use crate::{
    board::{
        domain::{
            Board, BoardDomainError, NewTask, Priority, TaskId, TaskMove, TaskPatch, TaskRecord,
            TaskTitle,
        },
        ports::{TaskStore, TaskStoreError},
    },
    session::{Session, SessionContext},
};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use thiserror::Error;
use tokio::sync::{Mutex as TaskLock, OwnedMutexGuard};
use tracing::{debug, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    tag: Option<Priority>,
}

impl CreateTaskRequest {
    /// Creates a request with the given title and no tag.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tag: None,
        }
    }

    /// Sets the priority tag.
    #[must_use]
    pub const fn with_tag(mut self, tag: Priority) -> Self {
        self.tag = Some(tag);
        self
    }
}

/// Request payload for editing a task's title or tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditTaskRequest {
    title: Option<String>,
    tag: Option<Priority>,
}

impl EditTaskRequest {
    /// Creates an edit that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the replacement title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the replacement tag.
    #[must_use]
    pub const fn with_tag(mut self, tag: Priority) -> Self {
        self.tag = Some(tag);
        self
    }

    fn into_patch(self) -> Result<TaskPatch, BoardDomainError> {
        let mut patch = TaskPatch::default();
        if let Some(title) = self.title {
            patch = patch.with_title(TaskTitle::new(title)?);
        }
        if let Some(tag) = self.tag {
            patch = patch.with_tag(tag);
        }
        Ok(patch)
    }
}

/// Service-level errors for board synchronization.
#[derive(Debug, Error)]
pub enum BoardSyncError {
    /// Local validation or move resolution failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// The task store rejected or could not complete the request.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
    /// Every allowed attempt hit a transport failure.
    #[error("task store unreachable after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Attempts made.
        attempts: u32,
        /// Failure of the last attempt.
        #[source]
        source: TaskStoreError,
    },
    /// The session was ended; the board no longer accepts operations.
    #[error("session has ended")]
    SessionEnded,
}

impl BoardSyncError {
    /// Returns `true` when the store no longer has the task.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(TaskStoreError::NotFound(_)))
    }

    /// Returns `true` for input rejected locally or by the store.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Domain(BoardDomainError::EmptyTitle) | Self::Store(TaskStoreError::Validation(_))
        )
    }
}

/// Result type for board synchronization operations.
pub type BoardSyncResult<T> = Result<T, BoardSyncError>;

/// Monotonic token identifying a published board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoardVersion(u64);

impl BoardVersion {
    /// Returns the raw counter value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for BoardVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Default)]
struct Snapshot {
    board: Board,
    version: BoardVersion,
}

type TaskLocks = HashMap<TaskId, Arc<TaskLock<()>>>;

/// Owns the session's board and keeps it in step with a task store.
pub struct BoardSyncService<S>
where
    S: TaskStore,
{
    store: Arc<S>,
    session: SessionContext,
    config: BoardSyncConfig,
    snapshot: Arc<RwLock<Snapshot>>,
    in_flight: Arc<Mutex<TaskLocks>>,
}

impl<S> Clone for BoardSyncService<S>
where
    S: TaskStore,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            session: self.session.clone(),
            config: self.config.clone(),
            snapshot: Arc::clone(&self.snapshot),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<S> BoardSyncService<S>
where
    S: TaskStore,
{
    /// Creates a service with an empty board. Call [`Self::load`] to fill it.
    #[must_use]
    pub fn new(store: Arc<S>, session: SessionContext, config: BoardSyncConfig) -> Self {
        Self {
            store,
            session,
            config,
            snapshot: Arc::new(RwLock::new(Snapshot::default())),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the current board.
    #[must_use]
    pub fn board(&self) -> Board {
        self.read_snapshot().board.clone()
    }

    /// Returns the version of the current board.
    #[must_use]
    pub fn version(&self) -> BoardVersion {
        self.read_snapshot().version
    }

    /// Returns the session context the service operates under.
    #[must_use]
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Loads the board from the store for a new session.
    ///
    /// # Errors
    ///
    /// See [`Self::refresh`].
    pub async fn load(&self) -> BoardSyncResult<Board> {
        self.refresh().await
    }

    /// Rebuilds the board from scratch from the store's records.
    ///
    /// The rebuilt board replaces any optimistic state and invalidates
    /// confirmations still in flight.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSyncError::SessionEnded`] after logout, or the store
    /// failure when the records cannot be listed; the board is then left as
    /// it was.
    pub async fn refresh(&self) -> BoardSyncResult<Board> {
        self.require_session()?;
        let records = self
            .config
            .retry
            .execute("list", move || self.store.list())
            .await?;
        let board = Board::project(&records);
        let version = self.publish(board.clone());
        debug!(%version, tasks = board.len(), "board refreshed from store");
        Ok(board)
    }

    /// Creates a task in the store and refreshes the board to include it.
    ///
    /// Nothing is inserted locally before the store assigns an identifier.
    /// Creation is attempted once whatever the retry policy: a create whose
    /// response was lost may already be committed, and repeating it would
    /// store a duplicate.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] without contacting the store
    /// when the title is blank, or the store failure otherwise. A store
    /// failure triggers a refresh.
    pub async fn create_task(&self, request: CreateTaskRequest) -> BoardSyncResult<TaskRecord> {
        self.require_session()?;
        let title = TaskTitle::new(request.title)?;
        let new_task = NewTask::new(&title, request.tag);
        let draft = &new_task;

        let result = RetryPolicy::none()
            .execute("create", move || self.store.create(draft))
            .await;
        match result {
            Ok(record) => {
                debug!(task_id = %record.id, "task created");
                if let Err(err) = self.refresh().await {
                    warn!(
                        task_id = %record.id,
                        error = %err,
                        "created task not yet on board; refresh failed"
                    );
                }
                Ok(record)
            }
            Err(err) => {
                warn!(error = %err, "task creation failed");
                self.resync().await;
                Err(err)
            }
        }
    }

    /// Applies a drag to the board and persists any status change.
    ///
    /// Returns the store's confirmed record when the move crossed columns,
    /// or `None` when it was local only.
    ///
    /// # Errors
    ///
    /// Returns a domain error when the move does not match the board, in
    /// which case nothing changes. Store failures are returned after the
    /// optimistic board has been published: a missing task triggers a
    /// refresh, any other failure leaves the optimistic placement in place.
    pub async fn move_task(&self, task_move: TaskMove) -> BoardSyncResult<Option<TaskRecord>> {
        self.require_session()?;
        if task_move.is_noop() {
            self.board().resolve_move(&task_move)?;
            return Ok(None);
        }

        let (version, new_status) = self.publish_with(|board| {
            let outcome = board.resolve_move(&task_move)?;
            let new_status = outcome.new_status();
            Ok((outcome.into_board(), new_status))
        })?;
        let task_id = &task_move.task_id;
        let Some(status) = new_status else {
            debug!(%task_id, %version, "task reordered within its column");
            return Ok(None);
        };

        let status_patch = TaskPatch::status(status);
        let patch = &status_patch;
        let guard = self.lock_task(task_id).await;
        debug!(%task_id, %status, %version, "persisting task status");
        let result = self
            .config
            .retry
            .execute("update", move || self.store.update(task_id, patch))
            .await;
        self.unlock_task(task_id, guard);

        match result {
            Ok(record) => {
                self.confirm(version, &record);
                Ok(Some(record))
            }
            Err(err) if err.is_not_found() => {
                warn!(%task_id, error = %err, "moved task is gone from the store");
                self.resync().await;
                Err(err)
            }
            Err(err) => {
                warn!(
                    %task_id,
                    %status,
                    error = %err,
                    "status update failed; keeping local placement"
                );
                Err(err)
            }
        }
    }

    /// Removes a task from the board and deletes it from the store.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownTask`] when the task is not on the
    /// board, or the store failure; a store failure triggers a refresh.
    pub async fn delete_task(&self, task_id: &TaskId) -> BoardSyncResult<TaskId> {
        self.require_session()?;
        let (version, ()) = self.publish_with(|board| Ok((board.without_task(task_id)?, ())))?;

        let guard = self.lock_task(task_id).await;
        debug!(%task_id, %version, "deleting task");
        let result = self
            .config
            .retry
            .execute("delete", move || self.store.delete(task_id))
            .await;
        self.unlock_task(task_id, guard);

        match result {
            Ok(deleted) => {
                debug!(%task_id, "task deleted");
                Ok(deleted)
            }
            Err(err) => {
                warn!(%task_id, error = %err, "task deletion failed");
                self.resync().await;
                Err(err)
            }
        }
    }

    /// Changes the title or tag of a task on the board and in the store.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] or
    /// [`BoardDomainError::UnknownTask`] without contacting the store, or the
    /// store failure; a store failure triggers a refresh.
    pub async fn edit_task(
        &self,
        task_id: &TaskId,
        request: EditTaskRequest,
    ) -> BoardSyncResult<TaskRecord> {
        self.require_session()?;
        let edit = request.into_patch()?;
        let (version, ()) = self.publish_with(|board| Ok((board.with_edit(task_id, &edit)?, ())))?;

        let patch = &edit;
        let guard = self.lock_task(task_id).await;
        debug!(%task_id, %version, "persisting task edit");
        let result = self
            .config
            .retry
            .execute("update", move || self.store.update(task_id, patch))
            .await;
        self.unlock_task(task_id, guard);

        match result {
            Ok(record) => {
                self.confirm(version, &record);
                Ok(record)
            }
            Err(err) => {
                warn!(%task_id, error = %err, "task edit failed");
                self.resync().await;
                Err(err)
            }
        }
    }

    /// Ends the session and clears the board.
    ///
    /// Confirmations still in flight are discarded.
    pub fn end_session(&self) -> Option<Session> {
        let ended = self.session.end();
        let version = self.publish(Board::empty());
        debug!(%version, "session ended; board cleared");
        ended
    }

    fn require_session(&self) -> BoardSyncResult<()> {
        if self.session.is_active() {
            Ok(())
        } else {
            Err(BoardSyncError::SessionEnded)
        }
    }

    /// Refreshes after a failed remote call, reporting but not returning a
    /// refresh failure.
    async fn resync(&self) {
        if let Err(err) = self.refresh().await {
            warn!(error = %err, "resynchronization with the store failed");
        }
    }

    fn read_snapshot(&self) -> std::sync::RwLockReadGuard<'_, Snapshot> {
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, board: Board) -> BoardVersion {
        let mut snapshot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        snapshot.version = snapshot.version.next();
        snapshot.board = board;
        snapshot.version
    }

    /// Derives the next board from the current one and publishes it
    /// atomically.
    fn publish_with<T>(
        &self,
        derive: impl FnOnce(&Board) -> Result<(Board, T), BoardDomainError>,
    ) -> BoardSyncResult<(BoardVersion, T)> {
        let mut snapshot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        let (board, extra) = derive(&snapshot.board)?;
        snapshot.version = snapshot.version.next();
        snapshot.board = board;
        Ok((snapshot.version, extra))
    }

    /// Applies a confirmed record unless the board moved on since `issued`.
    fn confirm(&self, issued: BoardVersion, record: &TaskRecord) {
        let mut snapshot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        if snapshot.version != issued {
            debug!(
                task_id = %record.id,
                %issued,
                current = %snapshot.version,
                "discarding stale confirmation"
            );
            return;
        }
        snapshot.board = snapshot.board.with_confirmed(record);
        snapshot.version = snapshot.version.next();
    }

    /// Waits for earlier remote calls on the same task to finish.
    async fn lock_task(&self, task_id: &TaskId) -> OwnedMutexGuard<()> {
        let slot = {
            let mut locks = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(task_id.clone()).or_default())
        };
        slot.lock_owned().await
    }

    fn unlock_task(&self, task_id: &TaskId, guard: OwnedMutexGuard<()>) {
        drop(guard);
        let mut locks = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        let idle = locks
            .get(task_id)
            .is_some_and(|slot| Arc::strong_count(slot) == 1);
        if idle {
            locks.remove(task_id);
        }
    }
}
