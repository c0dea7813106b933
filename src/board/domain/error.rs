//! Error types for board domain validation and parsing.

use super::{TaskId, WorkflowState};
use thiserror::Error;

/// Errors returned while constructing or transforming board values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The dragged task is not at the reported source position.
    #[error("task {task_id} is not at index {index} of column '{column}'")]
    TaskNotAtSource {
        /// Task reported as dragged.
        task_id: TaskId,
        /// Reported source column.
        column: WorkflowState,
        /// Reported source index.
        index: usize,
    },

    /// The drop position lies past the end of the destination column.
    #[error("index {index} is out of range for column '{column}' holding {len} tasks")]
    DestinationOutOfRange {
        /// Destination column.
        column: WorkflowState,
        /// Requested destination index.
        index: usize,
        /// Number of tasks the destination can be inserted among.
        len: usize,
    },

    /// The task is not placed on any column of the board.
    #[error("task {0} is not on the board")]
    UnknownTask(TaskId),
}

/// Error returned while parsing workflow states.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown workflow state: {0}")]
pub struct ParseWorkflowStateError(pub String);

/// Error returned while parsing priority tags.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority tag: {0}")]
pub struct ParsePriorityError(pub String);
