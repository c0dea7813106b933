//! Drag-and-drop move descriptors and their resolution against a board.

use super::{Board, BoardDomainError, TaskId, WorkflowState};
use serde::{Deserialize, Serialize};

/// A slot on the board: a column and an index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardPosition {
    /// Column holding the slot.
    pub column: WorkflowState,
    /// Zero-based index within the column.
    pub index: usize,
}

impl BoardPosition {
    /// Creates a board position.
    #[must_use]
    pub const fn new(column: WorkflowState, index: usize) -> Self {
        Self { column, index }
    }
}

/// Result of a completed drag: which task moved, from where, to where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMove {
    /// Dragged task.
    pub task_id: TaskId,
    /// Position the task was picked up from.
    pub source: BoardPosition,
    /// Position the task was dropped at.
    pub destination: BoardPosition,
}

impl TaskMove {
    /// Creates a move descriptor.
    #[must_use]
    pub const fn new(task_id: TaskId, source: BoardPosition, destination: BoardPosition) -> Self {
        Self {
            task_id,
            source,
            destination,
        }
    }

    /// Returns `true` when the task is dropped where it was picked up.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.source == self.destination
    }

    /// Returns `true` when the task changes column.
    #[must_use]
    pub fn crosses_columns(&self) -> bool {
        self.source.column != self.destination.column
    }
}

/// Board produced by a move, plus the remote update it calls for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    board: Board,
    new_status: Option<WorkflowState>,
}

impl MoveOutcome {
    /// Returns the resulting board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Consumes the outcome, returning the resulting board.
    #[must_use]
    pub fn into_board(self) -> Board {
        self.board
    }

    /// Returns `true` when the store must be told about a status change.
    #[must_use]
    pub const fn remote_update_needed(&self) -> bool {
        self.new_status.is_some()
    }

    /// Returns the status to persist, when a remote update is needed.
    #[must_use]
    pub const fn new_status(&self) -> Option<WorkflowState> {
        self.new_status
    }
}

impl Board {
    /// Resolves a drag into the next board.
    ///
    /// Reordering within a column is local only; moving across columns
    /// requests a status update to the destination column. The receiver is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::TaskNotAtSource`] when the task is not at
    /// the source position, or [`BoardDomainError::DestinationOutOfRange`]
    /// when the drop index lies past the end of the destination column.
    pub fn resolve_move(&self, task_move: &TaskMove) -> Result<MoveOutcome, BoardDomainError> {
        let TaskMove {
            task_id,
            source,
            destination,
        } = task_move;

        let at_source = self
            .column(source.column)
            .and_then(|column| column.task_ids().get(source.index));
        if at_source != Some(task_id) {
            return Err(BoardDomainError::TaskNotAtSource {
                task_id: task_id.clone(),
                column: source.column,
                index: source.index,
            });
        }

        if task_move.is_noop() {
            return Ok(MoveOutcome {
                board: self.clone(),
                new_status: None,
            });
        }

        let mut next = self.clone();
        let picked = next
            .column_entry(source.column)
            .task_ids_mut()
            .remove(source.index);

        let target = next.column_entry(destination.column).task_ids_mut();
        if destination.index > target.len() {
            return Err(BoardDomainError::DestinationOutOfRange {
                column: destination.column,
                index: destination.index,
                len: target.len(),
            });
        }
        target.insert(destination.index, picked);

        if !task_move.crosses_columns() {
            return Ok(MoveOutcome {
                board: next,
                new_status: None,
            });
        }

        next.set_card_status(task_id, destination.column);
        Ok(MoveOutcome {
            board: next,
            new_status: Some(destination.column),
        })
    }
}
