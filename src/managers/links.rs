//! Tracking link and pending link queue managers.

use std::sync::Arc;

use tracing::info;

use crate::ids;
use crate::models::pending::PendingLink;
use crate::models::tracking::TrackingLink;
use crate::persistence::db::Database;
use crate::persistence::pending_repo::PendingRepo;
use crate::persistence::tracking_repo::TrackingRepo;
use crate::{AppError, Result};

/// Bounded retries for short-id collisions at insert time.
const MAX_ID_ATTEMPTS: usize = 5;

/// Manager for tracking link records.
#[derive(Clone)]
pub struct TrackingLinks {
    repo: TrackingRepo,
}

impl TrackingLinks {
    /// Create a manager bound to the given store client.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            repo: TrackingRepo::new(db),
        }
    }

    /// Generate a tracking link for a (user, task) assignment and return
    /// its identifier. The click counter starts at zero.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Conflict` if the insert keeps colliding, and
    /// `AppError::Db` if it fails outright.
    pub async fn generate(&self, user_id: &str, task_id: &str) -> Result<String> {
        let seed = ids::tracking_seed(user_id, task_id);
        for _ in 0..MAX_ID_ATTEMPTS {
            let link_id = ids::short_id(&seed);
            if self.repo.insert_if_absent(&link_id, user_id, task_id).await? {
                info!(link_id, user_id, task_id, "tracking link generated");
                return Ok(link_id);
            }
        }
        Err(AppError::Conflict(format!(
            "could not generate a unique link id after {MAX_ID_ATTEMPTS} attempts"
        )))
    }

    /// Fetch a tracking link by identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get(&self, link_id: &str) -> Result<Option<TrackingLink>> {
        self.repo.get(link_id).await
    }

    /// Bump the click counter for a link.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the update fails.
    pub async fn increment_clicks(&self, link_id: &str) -> Result<()> {
        self.repo.increment_clicks(link_id).await
    }
}

/// Manager for the pending work-link queue.
///
/// A queue entry is the durable record that an admin still owes the
/// assignee a work link, independent of whether the live chat
/// notification succeeded.
#[derive(Clone)]
pub struct PendingQueue {
    repo: PendingRepo,
}

impl PendingQueue {
    /// Create a manager bound to the given store client.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            repo: PendingRepo::new(db),
        }
    }

    /// Record that a task awaits a work link. Upsert keyed by task.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the upsert fails.
    pub async fn save(&self, entry: &PendingLink) -> Result<()> {
        self.repo.upsert(entry).await
    }

    /// Fetch the pending entry for a task.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get(&self, task_id: &str) -> Result<Option<PendingLink>> {
        self.repo.get(task_id).await
    }

    /// List all pending entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<PendingLink>> {
        self.repo.list_all().await
    }

    /// Resolve (delete) the pending entry for a task.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the delete fails.
    pub async fn delete(&self, task_id: &str) -> Result<bool> {
        self.repo.delete(task_id).await
    }
}
