//! Pending link request model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Queue entry recording that a task has been assigned and an admin
/// still owes the assignee a work link. Persisted in `pending_links`,
/// keyed by task. Deleted once an admin supplies or explicitly skips
/// the work link.
///
/// Task title and tracking link are denormalized copies for display —
/// the queue is the durable record of "notification owed" independent
/// of whether the live chat message succeeded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingLink {
    /// Task awaiting a work link.
    pub task_id: String,
    /// Assignee the work link is owed to.
    pub user_id: String,
    /// Assignee's chat handle for display.
    pub username: String,
    /// Denormalized task title for display.
    pub task_title: String,
    /// When the admin notification was issued.
    pub message_sent: DateTime<Utc>,
    /// Denormalized tracking deep link for display.
    pub tracking_link: String,
}
