//! Task store port: the durable collection the board is projected from.

use crate::board::domain::{NewTask, TaskId, TaskPatch, TaskRecord};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Durable task record collection addressed by identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns every stored record in the store's natural order.
    async fn list(&self) -> TaskStoreResult<Vec<TaskRecord>>;

    /// Creates a record, assigning its identifier and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Validation`] when the title is empty.
    async fn create(&self, task: &NewTask) -> TaskStoreResult<TaskRecord>;

    /// Applies a partial update and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the record does not exist.
    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> TaskStoreResult<TaskRecord>;

    /// Deletes a record and returns its identifier.
    ///
    /// Deleting an already deleted record fails.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the record does not exist.
    async fn delete(&self, id: &TaskId) -> TaskStoreResult<TaskId>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The store rejected the input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The record was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The request could not complete.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a transport-level error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Returns `true` for failures worth retrying.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
