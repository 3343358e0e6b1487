//! Admin model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Admin privilege record persisted in the `admins` table.
///
/// The main admin is fixed at configuration time and never stored here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Admin {
    /// User the privilege is attached to.
    pub user_id: String,
    /// Chat handle recorded at grant time.
    pub username: String,
    /// Admin who granted the privilege.
    pub added_by: Option<String>,
    /// Grant timestamp.
    pub added_date: DateTime<Utc>,
    /// Permission tokens granted to this admin.
    pub permissions: Vec<String>,
}

/// Default permission set recorded for newly added admins.
#[must_use]
pub fn default_permissions() -> Vec<String> {
    vec!["manage_tasks".to_owned(), "view_stats".to_owned()]
}
