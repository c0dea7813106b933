//! Task store doubles wrapping the in-memory store.

use async_trait::async_trait;
use ozikanban::board::{
    adapters::memory::InMemoryTaskStore,
    domain::{NewTask, TaskId, TaskPatch, TaskRecord, WorkflowState},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::sync::Notify;

fn unreachable_store() -> TaskStoreError {
    TaskStoreError::transport(std::io::Error::other("store unreachable"))
}

/// Takes one failure from `budget`, returning `true` when a failure is due.
fn take_failure(budget: &AtomicU32) -> bool {
    budget
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
        .is_ok()
}

/// In-memory store whose calls can be made to fail with transport errors.
#[derive(Default)]
pub struct FlakyStore {
    inner: InMemoryTaskStore,
    failing_creates: AtomicU32,
    failing_updates: AtomicU32,
    failing_deletes: AtomicU32,
}

impl FlakyStore {
    /// Wraps an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the wrapped store, which never fails.
    pub const fn inner(&self) -> &InMemoryTaskStore {
        &self.inner
    }

    /// Fails the next `count` create calls.
    pub fn fail_creates(&self, count: u32) {
        self.failing_creates.store(count, Ordering::SeqCst);
    }

    /// Fails the next `count` update calls.
    pub fn fail_updates(&self, count: u32) {
        self.failing_updates.store(count, Ordering::SeqCst);
    }

    /// Fails the next `count` delete calls.
    pub fn fail_deletes(&self, count: u32) {
        self.failing_deletes.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl TaskStore for FlakyStore {
    async fn list(&self) -> TaskStoreResult<Vec<TaskRecord>> {
        self.inner.list().await
    }

    async fn create(&self, task: &NewTask) -> TaskStoreResult<TaskRecord> {
        if take_failure(&self.failing_creates) {
            return Err(unreachable_store());
        }
        self.inner.create(task).await
    }

    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> TaskStoreResult<TaskRecord> {
        if take_failure(&self.failing_updates) {
            return Err(unreachable_store());
        }
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: &TaskId) -> TaskStoreResult<TaskId> {
        if take_failure(&self.failing_deletes) {
            return Err(unreachable_store());
        }
        self.inner.delete(id).await
    }
}

/// In-memory store that holds its first update until released and records
/// the order and overlap of update calls.
#[derive(Default)]
pub struct GatedStore {
    inner: InMemoryTaskStore,
    gate: Notify,
    released: AtomicBool,
    updates: Mutex<Vec<(TaskId, Option<WorkflowState>)>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl GatedStore {
    /// Wraps an empty in-memory store with the gate closed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the wrapped store.
    pub const fn inner(&self) -> &InMemoryTaskStore {
        &self.inner
    }

    /// Lets the held update, and every later one, proceed.
    pub fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
        self.gate.notify_waiters();
        self.gate.notify_one();
    }

    /// Returns update calls in the order they reached the store.
    pub fn updates(&self) -> Vec<(TaskId, Option<WorkflowState>)> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the highest number of updates observed running at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskStore for GatedStore {
    async fn list(&self) -> TaskStoreResult<Vec<TaskRecord>> {
        self.inner.list().await
    }

    async fn create(&self, task: &NewTask) -> TaskStoreResult<TaskRecord> {
        self.inner.create(task).await
    }

    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> TaskStoreResult<TaskRecord> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id.clone(), patch.status));
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        if !self.released.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        let result = self.inner.update(id, patch).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn delete(&self, id: &TaskId) -> TaskStoreResult<TaskId> {
        self.inner.delete(id).await
    }
}
