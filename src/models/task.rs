//! Task model — the aggregate root of the marketplace.
//!
//! User-task links, tracking links, and pending link requests are all
//! derived from a task's assignment/completion state and must stay
//! consistent with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of paid work offered to users.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Attract subscribers to a channel.
    Subscribers,
    /// Publish an advertising post.
    AdPost,
    /// Drive clicks through a link.
    Clicks,
    /// Drive application installs.
    AppInstall,
    /// Anything else.
    Other,
}

impl TaskKind {
    /// Stable storage token for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subscribers => "subscribers",
            Self::AdPost => "ad_post",
            Self::Clicks => "clicks",
            Self::AppInstall => "app_install",
            Self::Other => "other",
        }
    }

    /// Parse a storage token back into a kind.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "subscribers" => Some(Self::Subscribers),
            "ad_post" => Some(Self::AdPost),
            "clicks" => Some(Self::Clicks),
            "app_install" => Some(Self::AppInstall),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Human-readable label shown in chat menus.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Subscribers => "Subscriber acquisition",
            Self::AdPost => "Advertising post",
            Self::Clicks => "Link clicks",
            Self::AppInstall => "App installs",
            Self::Other => "Other",
        }
    }
}

/// Field set required to create a task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    /// Short title shown in task lists.
    pub title: String,
    /// Full description of the work.
    pub description: String,
    /// Task category.
    pub kind: TaskKind,
    /// Numeric target description, e.g. "1000 subscribers".
    pub target: String,
    /// Monetary reward credited on completion.
    pub reward: f64,
    /// Additional requirements text.
    pub requirements: String,
}

/// Task domain entity persisted in the `tasks` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Short opaque identifier.
    pub task_id: String,
    /// Short title shown in task lists.
    pub title: String,
    /// Full description of the work.
    pub description: String,
    /// Task category.
    pub kind: TaskKind,
    /// Numeric target description.
    pub target: String,
    /// Monetary reward credited on completion.
    pub reward: f64,
    /// Additional requirements text.
    pub requirements: String,
    /// Admin who created the task.
    pub created_by: String,
    /// Creation timestamp.
    pub created_date: DateTime<Utc>,
    /// Whether the task is still part of the live pool.
    pub active: bool,
    /// Current assignee, if any. At most one at a time.
    pub taken_by: Option<String>,
    /// Assignment timestamp.
    pub assigned_date: Option<DateTime<Utc>>,
    /// Whether the task has been completed.
    pub completed: bool,
    /// Completion timestamp.
    pub completed_date: Option<DateTime<Utc>>,
    /// Completion proof supplied by the assignee.
    pub proof: Option<String>,
    /// Work link handed out by an admin.
    pub work_link: Option<String>,
    /// Whether the task can still be claimed.
    pub available: bool,
}

impl Task {
    /// Whether a user may claim this task right now.
    #[must_use]
    pub fn is_claimable(&self) -> bool {
        self.available && self.active && self.taken_by.is_none()
    }
}
