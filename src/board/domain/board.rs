//! Columnar board structure and the projection from task records.

use super::{BoardDomainError, Priority, TaskId, TaskPatch, TaskRecord, TaskStatus, WorkflowState};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Lightweight view of a task as displayed on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskCard {
    id: TaskId,
    content: String,
    tag: Option<Priority>,
    status: WorkflowState,
}

impl TaskCard {
    fn from_record(record: &TaskRecord, status: WorkflowState) -> Self {
        Self {
            id: record.id.clone(),
            content: record.title.as_str().to_owned(),
            tag: record.tag,
            status,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the displayed content (the task title).
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the tag exactly as stored, if any.
    #[must_use]
    pub const fn tag(&self) -> Option<Priority> {
        self.tag
    }

    /// Returns the effective priority, treating an absent tag as lowest.
    #[must_use]
    pub fn priority(&self) -> Priority {
        self.tag.unwrap_or_default()
    }

    /// Returns the uppercase badge label shown on the card.
    #[must_use]
    pub fn badge(&self) -> &'static str {
        self.priority().badge()
    }

    /// Returns the status last known to the board.
    #[must_use]
    pub const fn status(&self) -> WorkflowState {
        self.status
    }
}

/// Ordered bucket of task identifiers for one workflow state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    id: WorkflowState,
    title: String,
    task_ids: Vec<TaskId>,
}

impl Column {
    fn empty(id: WorkflowState) -> Self {
        Self {
            id,
            title: id.title().to_owned(),
            task_ids: Vec::new(),
        }
    }

    /// Returns the column identifier.
    #[must_use]
    pub const fn id(&self) -> WorkflowState {
        self.id
    }

    /// Returns the display label.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the ordered task identifiers in this column.
    #[must_use]
    pub fn task_ids(&self) -> &[TaskId] {
        &self.task_ids
    }

    /// Returns the number of tasks in this column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.task_ids.len()
    }

    /// Returns `true` when the column holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }

    pub(super) const fn task_ids_mut(&mut self) -> &mut Vec<TaskId> {
        &mut self.task_ids
    }
}

/// In-memory columnar view of the tasks known to a session.
///
/// Every operation returns a new board; a board value is never modified
/// after construction, so a retained snapshot is always a valid rollback
/// point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    tasks: HashMap<TaskId, TaskCard>,
    columns: HashMap<WorkflowState, Column>,
    column_order: Vec<WorkflowState>,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    /// Creates a board with the fixed columns and no tasks.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            tasks: HashMap::new(),
            columns: WorkflowState::ORDER
                .into_iter()
                .map(|state| (state, Column::empty(state)))
                .collect(),
            column_order: WorkflowState::ORDER.to_vec(),
        }
    }

    /// Builds a board from a flat list of task records.
    ///
    /// Cards are placed in the column matching their status, in input order.
    /// Records whose status has no column are left off the board entirely.
    #[must_use]
    pub fn project(records: &[TaskRecord]) -> Self {
        let mut board = Self::empty();
        for record in records {
            let TaskStatus::Workflow(state) = &record.status else {
                warn!(
                    task_id = %record.id,
                    status = %record.status,
                    "dropping task with a status the board has no column for"
                );
                continue;
            };
            board
                .tasks
                .insert(record.id.clone(), TaskCard::from_record(record, *state));
            board.column_entry(*state).task_ids.push(record.id.clone());
        }
        board
    }

    /// Returns all cards keyed by task identifier.
    #[must_use]
    pub const fn tasks(&self) -> &HashMap<TaskId, TaskCard> {
        &self.tasks
    }

    /// Returns the card for a task, if it is on the board.
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&TaskCard> {
        self.tasks.get(id)
    }

    /// Returns the column for a workflow state.
    #[must_use]
    pub fn column(&self, state: WorkflowState) -> Option<&Column> {
        self.columns.get(&state)
    }

    /// Returns all columns keyed by identifier.
    #[must_use]
    pub const fn columns(&self) -> &HashMap<WorkflowState, Column> {
        &self.columns
    }

    /// Returns the left-to-right column order.
    #[must_use]
    pub fn column_order(&self) -> &[WorkflowState] {
        &self.column_order
    }

    /// Iterates the columns in display order.
    pub fn columns_in_order(&self) -> impl Iterator<Item = &Column> {
        self.column_order
            .iter()
            .filter_map(|state| self.columns.get(state))
    }

    /// Returns the cards of a column in display order.
    #[must_use]
    pub fn cards_in(&self, state: WorkflowState) -> Vec<&TaskCard> {
        self.column(state)
            .map(|column| {
                column
                    .task_ids
                    .iter()
                    .filter_map(|id| self.tasks.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the column currently holding a task.
    #[must_use]
    pub fn column_of(&self, id: &TaskId) -> Option<WorkflowState> {
        self.columns_in_order()
            .find(|column| column.task_ids.contains(id))
            .map(Column::id)
    }

    /// Returns the number of tasks on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when the board holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Checks the structural invariants of the board.
    ///
    /// Holds when the column order names exactly the columns present, every
    /// card sits in exactly one column, no column lists an unknown id, and
    /// each card's status matches the column holding it.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let ordered: HashSet<WorkflowState> = self.column_order.iter().copied().collect();
        let keyed: HashSet<WorkflowState> = self.columns.keys().copied().collect();
        if ordered != keyed || ordered.len() != self.column_order.len() {
            return false;
        }

        let mut placed = HashSet::new();
        for column in self.columns.values() {
            for id in &column.task_ids {
                let Some(card) = self.tasks.get(id) else {
                    return false;
                };
                if card.status != column.id || !placed.insert(id) {
                    return false;
                }
            }
        }
        placed.len() == self.tasks.len()
    }

    /// Returns a board without the given task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownTask`] when no column holds the
    /// task.
    pub fn without_task(&self, id: &TaskId) -> Result<Self, BoardDomainError> {
        let state = self
            .column_of(id)
            .ok_or_else(|| BoardDomainError::UnknownTask(id.clone()))?;
        let mut next = self.clone();
        next.tasks.remove(id);
        next.column_entry(state).task_ids.retain(|task_id| task_id != id);
        Ok(next)
    }

    /// Returns a board with the title and tag of a card replaced.
    ///
    /// Status changes in the patch are ignored; column membership only
    /// changes through [`Board::resolve_move`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownTask`] when the task is not on the
    /// board.
    pub fn with_edit(&self, id: &TaskId, patch: &TaskPatch) -> Result<Self, BoardDomainError> {
        let mut next = self.clone();
        let card = next
            .tasks
            .get_mut(id)
            .ok_or_else(|| BoardDomainError::UnknownTask(id.clone()))?;
        if let Some(title) = &patch.title {
            title.as_str().clone_into(&mut card.content);
        }
        if let Some(tag) = patch.tag {
            card.tag = Some(tag);
        }
        Ok(next)
    }

    /// Returns a board reflecting a record confirmed by the store.
    ///
    /// The card keeps its column; only its view fields and last-known status
    /// are refreshed. Records for tasks no longer on the board are ignored.
    #[must_use]
    pub fn with_confirmed(&self, record: &TaskRecord) -> Self {
        let mut next = self.clone();
        if let Some(card) = next.tasks.get_mut(&record.id) {
            record.title.as_str().clone_into(&mut card.content);
            card.tag = record.tag;
            if let Some(state) = record.status.workflow() {
                card.status = state;
            }
        }
        next
    }

    pub(super) fn column_entry(&mut self, state: WorkflowState) -> &mut Column {
        self.columns
            .entry(state)
            .or_insert_with(|| Column::empty(state))
    }

    pub(super) fn set_card_status(&mut self, id: &TaskId, state: WorkflowState) {
        if let Some(card) = self.tasks.get_mut(id) {
            card.status = state;
        }
    }
}
