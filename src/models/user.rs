//! User model and derived statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User domain entity persisted in the `users` table.
///
/// Created on first contact, mutated only by earnings accrual, never
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Opaque identifier handed over by the chat transport.
    pub user_id: String,
    /// Chat handle, may be empty.
    pub username: String,
    /// Display name, may be empty.
    pub first_name: String,
    /// First-contact timestamp.
    pub joined_date: DateTime<Utc>,
    /// Cumulative earnings. Monotonic — never decreases.
    pub earned: f64,
}

/// Aggregated per-user statistics for the profile screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserStats {
    /// Number of completed tasks.
    pub completed_count: i64,
    /// Number of currently active tasks.
    pub active_count: i64,
    /// Cumulative earnings.
    pub total_earned: f64,
    /// Derived rating, see [`rating_for`].
    pub rating: i64,
}

/// Derive a user's rating from the number of completed tasks.
///
/// One derived point per completed task, scaled by ten. No cap is
/// enforced.
#[must_use]
pub const fn rating_for(completed_count: i64) -> i64 {
    completed_count * 10
}
