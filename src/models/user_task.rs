//! User-task link model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Relationship status between a user and a task — exactly one of these
/// at a time, and it must agree with the task's own assignee/completed
/// fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserTaskStatus {
    /// Task is assigned and in progress.
    Active,
    /// Task has been completed by the user.
    Completed,
}

impl UserTaskStatus {
    /// Stable storage token for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Parse a storage token back into a status.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Join row between a user and a task, persisted in `user_tasks`.
///
/// At most one row exists per (user, task) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserTask {
    /// The user side of the link.
    pub user_id: String,
    /// The task side of the link.
    pub task_id: String,
    /// Current relationship status.
    pub status: UserTaskStatus,
    /// When the task was taken.
    pub taken_date: DateTime<Utc>,
    /// When the task was completed, if it has been.
    pub completed_date: Option<DateTime<Utc>>,
}
