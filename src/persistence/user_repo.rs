//! User repository for `SQLite` persistence.

use std::sync::Arc;

use chrono::Utc;

use crate::models::user::User;
use crate::{AppError, Result};

use super::db::Database;

/// Repository for user records.
#[derive(Clone)]
pub struct UserRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: String,
    username: String,
    first_name: String,
    joined_date: String,
    earned: f64,
}

impl UserRow {
    fn into_user(self) -> Result<User> {
        let joined_date = chrono::DateTime::parse_from_rfc3339(&self.joined_date)
            .map_err(|e| AppError::Db(format!("invalid joined_date: {e}")))?
            .with_timezone(&Utc);
        Ok(User {
            user_id: self.user_id,
            username: self.username,
            first_name: self.first_name,
            joined_date,
            earned: self.earned,
        })
    }
}

impl UserRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Fetch a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get(&self, user_id: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT user_id, username, first_name, joined_date, earned
             FROM users WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(self.db.as_ref())
        .await?;
        row.map(UserRow::into_user).transpose()
    }

    /// Insert a user row if one does not already exist.
    ///
    /// Returns `true` when a new row was created. Earnings start at zero.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insert fails.
    pub async fn insert_if_absent(
        &self,
        user_id: &str,
        username: &str,
        first_name: &str,
    ) -> Result<bool> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO users (user_id, username, first_name, joined_date, earned, rating)
             VALUES (?1, ?2, ?3, ?4, 0, 0)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(username)
        .bind(first_name)
        .bind(&now)
        .execute(self.db.as_ref())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Credit earnings to a user. The increment is always non-negative,
    /// so the cumulative amount never decreases.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the update fails, or `AppError::Validation`
    /// for a negative amount.
    pub async fn add_earned(&self, user_id: &str, amount: f64) -> Result<()> {
        if amount < 0.0 {
            return Err(AppError::Validation("earned amount must not be negative".into()));
        }
        sqlx::query("UPDATE users SET earned = earned + ?1 WHERE user_id = ?2")
            .bind(amount)
            .bind(user_id)
            .execute(self.db.as_ref())
            .await?;
        Ok(())
    }

    /// Count user-task links for a user with the given status.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn count_links_with_status(&self, user_id: &str, status: &str) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM user_tasks WHERE user_id = ?1 AND status = ?2",
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(self.db.as_ref())
        .await?;
        Ok(count.0)
    }

    /// Count all users.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.db.as_ref())
            .await?;
        Ok(count.0)
    }

    /// List the top earners, highest first, excluding zero earners.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn top_earners(&self, limit: i64) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT user_id, username, first_name, joined_date, earned
             FROM users WHERE earned > 0
             ORDER BY earned DESC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(self.db.as_ref())
        .await?;
        rows.into_iter().map(UserRow::into_user).collect()
    }
}
