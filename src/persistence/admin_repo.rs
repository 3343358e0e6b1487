//! Admin repository for `SQLite` persistence.

use std::sync::Arc;

use chrono::Utc;

use crate::models::admin::Admin;
use crate::{AppError, Result};

use super::db::Database;

/// Repository for admin privilege records.
#[derive(Clone)]
pub struct AdminRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct AdminRow {
    user_id: String,
    username: String,
    added_by: Option<String>,
    added_date: String,
    permissions: String,
}

impl AdminRow {
    fn into_admin(self) -> Result<Admin> {
        let added_date = chrono::DateTime::parse_from_rfc3339(&self.added_date)
            .map_err(|e| AppError::Db(format!("invalid added_date: {e}")))?
            .with_timezone(&Utc);
        let permissions: Vec<String> = serde_json::from_str(&self.permissions)
            .map_err(|e| AppError::Db(format!("invalid permissions json: {e}")))?;
        Ok(Admin {
            user_id: self.user_id,
            username: self.username,
            added_by: self.added_by,
            added_date,
            permissions,
        })
    }
}

impl AdminRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Whether an admin row exists for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn exists(&self, user_id: &str) -> Result<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admins WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(self.db.as_ref())
            .await?;
        Ok(count.0 > 0)
    }

    /// Insert an admin row if one does not already exist (idempotent).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insert fails.
    pub async fn insert_if_absent(
        &self,
        user_id: &str,
        username: &str,
        added_by: Option<&str>,
        permissions: &[String],
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let perms = serde_json::to_string(permissions)
            .map_err(|e| AppError::Db(format!("failed to encode permissions: {e}")))?;
        sqlx::query(
            "INSERT INTO admins (user_id, username, added_by, added_date, permissions)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(username)
        .bind(added_by)
        .bind(&now)
        .bind(&perms)
        .execute(self.db.as_ref())
        .await?;
        Ok(())
    }

    /// Delete an admin row. Returns whether a row existed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the delete fails.
    pub async fn delete(&self, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM admins WHERE user_id = ?1")
            .bind(user_id)
            .execute(self.db.as_ref())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all admin records.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Admin>> {
        let rows: Vec<AdminRow> = sqlx::query_as(
            "SELECT user_id, username, added_by, added_date, permissions
             FROM admins ORDER BY added_date ASC",
        )
        .fetch_all(self.db.as_ref())
        .await?;
        rows.into_iter().map(AdminRow::into_admin).collect()
    }
}
