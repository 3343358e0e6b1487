//! User manager.

use std::sync::Arc;

use tracing::info;

use crate::models::user::{rating_for, User, UserStats};
use crate::models::user_task::UserTaskStatus;
use crate::persistence::db::Database;
use crate::persistence::user_repo::UserRepo;
use crate::Result;

/// Manager for user records and derived statistics.
#[derive(Clone)]
pub struct UserManager {
    repo: UserRepo,
}

impl UserManager {
    /// Create a manager bound to the given store client.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            repo: UserRepo::new(db),
        }
    }

    /// Idempotent upsert on first contact. Earnings start at zero.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store operation fails.
    pub async fn get_or_create(
        &self,
        user_id: &str,
        username: &str,
        first_name: &str,
    ) -> Result<()> {
        if self.repo.insert_if_absent(user_id, username, first_name).await? {
            info!(user_id, "new user registered");
        }
        Ok(())
    }

    /// Fetch a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get(&self, user_id: &str) -> Result<Option<User>> {
        self.repo.get(user_id).await
    }

    /// Aggregated statistics for the profile screen.
    ///
    /// The rating is a pure function of the completed count — it is
    /// computed here, never stored.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if any query fails.
    pub async fn stats(&self, user_id: &str) -> Result<UserStats> {
        let completed_count = self
            .repo
            .count_links_with_status(user_id, UserTaskStatus::Completed.as_str())
            .await?;
        let active_count = self
            .repo
            .count_links_with_status(user_id, UserTaskStatus::Active.as_str())
            .await?;
        let total_earned = self
            .repo
            .get(user_id)
            .await?
            .map_or(0.0, |user| user.earned);

        Ok(UserStats {
            completed_count,
            active_count,
            total_earned,
            rating: rating_for(completed_count),
        })
    }

    /// Credit earnings. The cumulative amount never decreases.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the update fails, or
    /// `AppError::Validation` for a negative amount.
    pub async fn add_earned(&self, user_id: &str, amount: f64) -> Result<()> {
        self.repo.add_earned(user_id, amount).await
    }

    /// Count all registered users.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn count(&self) -> Result<i64> {
        self.repo.count().await
    }

    /// List the top earners, highest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn top_earners(&self, limit: i64) -> Result<Vec<User>> {
        self.repo.top_earners(limit).await
    }
}
