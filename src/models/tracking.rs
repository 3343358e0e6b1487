//! Tracking link model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque short identifier attributing external click activity to a
/// specific (user, task) assignment. Persisted in `tracking_links`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackingLink {
    /// Short opaque identifier used as the deep-link start token.
    pub link_id: String,
    /// User the clicks are attributed to.
    pub user_id: String,
    /// Task the clicks are attributed to.
    pub task_id: String,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Click counter, mutated only by increment.
    pub clicks: i64,
    /// Conversion counter.
    pub conversions: i64,
    /// Whether the link is still live.
    pub active: bool,
    /// Work link associated with this tracking link, if any.
    pub work_link: Option<String>,
}
