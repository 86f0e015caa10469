//! Task-related entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started yet.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Converts the status to a string for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(Self::Todo),
            "in-progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// A tracked task, optionally assigned to a user.
///
/// `assignee_name` is a denormalized snapshot of the assignee's display
/// name, captured at the last write that touched `assignee_id`. It is never
/// recomputed on read and can diverge from the user's current name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier.
    pub id: Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Assigned user's ID, if any. Not validated to reference an existing
    /// user.
    pub assignee_id: Option<Uuid>,
    /// Snapshot of the assignee's name as of the last assignment write.
    pub assignee_name: Option<String>,
    /// Current status.
    pub status: TaskStatus,
    /// Caller-supplied due date, stored and returned verbatim.
    pub due_date: Option<String>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new unassigned task with default status.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            assignee_id: None,
            assignee_name: None,
            status: TaskStatus::default(),
            due_date: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the status for this task.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the due date for this task.
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }
}
