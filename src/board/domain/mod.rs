//! Domain model for the Kanban board.
//!
//! Task records, the columnar board derived from them, and drag resolution.
//! Everything here is a pure value transformation; infrastructure stays
//! outside the domain boundary.

mod board;
mod error;
mod ids;
mod movement;
mod task;

pub use board::{Board, Column, TaskCard};
pub use error::{BoardDomainError, ParsePriorityError, ParseWorkflowStateError};
pub use ids::{TaskId, TaskTitle};
pub use movement::{BoardPosition, MoveOutcome, TaskMove};
pub use task::{NewTask, Priority, TaskPatch, TaskRecord, TaskStatus, WorkflowState};
