//! Persisted task records and the closed value sets they draw from.

use super::{ParsePriorityError, ParseWorkflowStateError, TaskId, TaskTitle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Workflow state a task occupies; each state is one board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WorkflowState {
    /// Work not yet started.
    #[serde(rename = "todo")]
    Todo,
    /// Work under way.
    #[serde(rename = "in-progress")]
    InProgress,
    /// Work finished.
    #[serde(rename = "done")]
    Done,
}

impl WorkflowState {
    /// State every newly created task starts in.
    pub const FIRST: Self = Self::Todo;

    /// Left-to-right display order of the board columns.
    pub const ORDER: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    /// Matches a stored status exactly against the wire values.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|state| state.as_str() == value)
    }

    /// Returns the column display label.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

/// Lenient parse for typed input: surrounding whitespace and case are
/// ignored. Stored statuses go through [`WorkflowState::from_wire`].
impl TryFrom<&str> for WorkflowState {
    type Error = ParseWorkflowStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseWorkflowStateError(value.to_owned())),
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a stored record as seen by the board.
///
/// The store may hold statuses the board has no column for; those decode as
/// [`TaskStatus::Unrecognised`] instead of failing the whole listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    /// A status with a board column.
    Workflow(WorkflowState),
    /// A status the board cannot place.
    Unrecognised(String),
}

impl TaskStatus {
    /// Returns the workflow state when the status is board-representable.
    #[must_use]
    pub const fn workflow(&self) -> Option<WorkflowState> {
        match self {
            Self::Workflow(state) => Some(*state),
            Self::Unrecognised(_) => None,
        }
    }
}

impl From<WorkflowState> for TaskStatus {
    fn from(value: WorkflowState) -> Self {
        Self::Workflow(value)
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match WorkflowState::from_wire(&value) {
            Some(state) => Self::Workflow(state),
            None => Self::Unrecognised(value),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(value: TaskStatus) -> Self {
        match value {
            TaskStatus::Workflow(state) => state.as_str().to_owned(),
            TaskStatus::Unrecognised(raw) => raw,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workflow(state) => f.write_str(state.as_str()),
            Self::Unrecognised(raw) => f.write_str(raw),
        }
    }
}

/// Priority tag attached to a task. Absent tags rank as [`Priority::Low`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    /// Lowest priority.
    #[default]
    Low,
    /// Medium priority.
    Medium,
    /// Highest priority.
    High,
}

impl Priority {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Returns the uppercase card badge label.
    #[must_use]
    pub const fn badge(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decodes an optional tag, treating unknown labels as absent.
fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| Priority::try_from(value.as_str()).ok()))
}

/// Task record as persisted by a task store and exchanged over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Store-assigned identifier.
    #[serde(alias = "_id")]
    pub id: TaskId,
    /// Task title.
    pub title: TaskTitle,
    /// Optional priority tag.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_priority"
    )]
    pub tag: Option<Priority>,
    /// Workflow status.
    pub status: TaskStatus,
    /// Store-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Store-assigned last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task record.
///
/// The title is carried unvalidated so stores can enforce their own
/// contract; services build it from a [`TaskTitle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Requested title.
    pub title: String,
    /// Optional priority tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Priority>,
    /// Initial status.
    pub status: WorkflowState,
}

impl NewTask {
    /// Creates input for a task starting in [`WorkflowState::FIRST`].
    #[must_use]
    pub fn new(title: &TaskTitle, tag: Option<Priority>) -> Self {
        Self {
            title: title.as_str().to_owned(),
            tag,
            status: WorkflowState::FIRST,
        }
    }
}

/// Partial update of a task record. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// Replacement title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<TaskTitle>,
    /// Replacement tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Priority>,
    /// Replacement status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkflowState>,
}

impl TaskPatch {
    /// Creates a patch that only changes the status.
    #[must_use]
    pub const fn status(status: WorkflowState) -> Self {
        Self {
            title: None,
            tag: None,
            status: Some(status),
        }
    }

    /// Sets the replacement title.
    #[must_use]
    pub fn with_title(mut self, title: TaskTitle) -> Self {
        self.title = Some(title);
        self
    }

    /// Sets the replacement tag.
    #[must_use]
    pub const fn with_tag(mut self, tag: Priority) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.tag.is_none() && self.status.is_none()
    }
}
