//! In-memory task store.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::{
    domain::{NewTask, TaskId, TaskPatch, TaskRecord, TaskStatus, TaskTitle},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory task store.
///
/// Records are kept in insertion order, which is the natural order returned
/// by [`TaskStore::list`].
pub struct InMemoryTaskStore<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    records: Arc<RwLock<Vec<TaskRecord>>>,
    clock: Arc<C>,
}

impl<C> Clone for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl InMemoryTaskStore<DefaultClock> {
    /// Creates an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryTaskStore<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store stamping records with the given clock.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            clock,
        }
    }

    /// Replaces the stored records, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Transport`] when the store lock is poisoned.
    pub fn seed(&self, records: Vec<TaskRecord>) -> TaskStoreResult<()> {
        *self.write()? = records;
        Ok(())
    }

    fn read(&self) -> TaskStoreResult<RwLockReadGuard<'_, Vec<TaskRecord>>> {
        self.records
            .read()
            .map_err(|err| TaskStoreError::transport(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> TaskStoreResult<RwLockWriteGuard<'_, Vec<TaskRecord>>> {
        self.records
            .write()
            .map_err(|err| TaskStoreError::transport(std::io::Error::other(err.to_string())))
    }
}

fn apply_patch(record: &mut TaskRecord, patch: &TaskPatch) {
    if let Some(title) = &patch.title {
        record.title = title.clone();
    }
    if let Some(tag) = patch.tag {
        record.tag = Some(tag);
    }
    if let Some(status) = patch.status {
        record.status = TaskStatus::Workflow(status);
    }
}

#[async_trait]
impl<C> TaskStore for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    async fn list(&self) -> TaskStoreResult<Vec<TaskRecord>> {
        Ok(self.read()?.clone())
    }

    async fn create(&self, task: &NewTask) -> TaskStoreResult<TaskRecord> {
        let title = TaskTitle::new(task.title.as_str())
            .map_err(|err| TaskStoreError::Validation(err.to_string()))?;
        let timestamp = self.clock.utc();
        let record = TaskRecord {
            id: TaskId::generate(),
            title,
            tag: task.tag,
            status: TaskStatus::Workflow(task.status),
            created_at: timestamp,
            updated_at: timestamp,
        };
        self.write()?.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> TaskStoreResult<TaskRecord> {
        let mut records = self.write()?;
        let record = records
            .iter_mut()
            .find(|record| record.id == *id)
            .ok_or_else(|| TaskStoreError::NotFound(id.clone()))?;
        apply_patch(record, patch);
        record.updated_at = self.clock.utc();
        Ok(record.clone())
    }

    async fn delete(&self, id: &TaskId) -> TaskStoreResult<TaskId> {
        let mut records = self.write()?;
        let position = records
            .iter()
            .position(|record| record.id == *id)
            .ok_or_else(|| TaskStoreError::NotFound(id.clone()))?;
        records.remove(position);
        Ok(id.clone())
    }
}
