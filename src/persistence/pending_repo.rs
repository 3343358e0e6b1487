//! Pending link queue repository for `SQLite` persistence.

use std::sync::Arc;

use chrono::Utc;

use crate::models::pending::PendingLink;
use crate::{AppError, Result};

use super::db::Database;

/// Repository for pending work-link requests, keyed by task.
#[derive(Clone)]
pub struct PendingRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct PendingRow {
    task_id: String,
    user_id: String,
    username: String,
    task_title: String,
    message_sent: String,
    tracking_link: String,
}

impl PendingRow {
    fn into_pending(self) -> Result<PendingLink> {
        let message_sent = chrono::DateTime::parse_from_rfc3339(&self.message_sent)
            .map_err(|e| AppError::Db(format!("invalid message_sent: {e}")))?
            .with_timezone(&Utc);
        Ok(PendingLink {
            task_id: self.task_id,
            user_id: self.user_id,
            username: self.username,
            task_title: self.task_title,
            message_sent,
            tracking_link: self.tracking_link,
        })
    }
}

impl PendingRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert or replace the pending entry for a task.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the upsert fails.
    pub async fn upsert(&self, entry: &PendingLink) -> Result<()> {
        sqlx::query(
            "INSERT INTO pending_links (task_id, user_id, username, task_title, message_sent, tracking_link)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (task_id) DO UPDATE SET
                 user_id = excluded.user_id,
                 username = excluded.username,
                 task_title = excluded.task_title,
                 message_sent = excluded.message_sent,
                 tracking_link = excluded.tracking_link",
        )
        .bind(&entry.task_id)
        .bind(&entry.user_id)
        .bind(&entry.username)
        .bind(&entry.task_title)
        .bind(entry.message_sent.to_rfc3339())
        .bind(&entry.tracking_link)
        .execute(self.db.as_ref())
        .await?;
        Ok(())
    }

    /// Fetch the pending entry for a task.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get(&self, task_id: &str) -> Result<Option<PendingLink>> {
        let row: Option<PendingRow> = sqlx::query_as(
            "SELECT task_id, user_id, username, task_title, message_sent, tracking_link
             FROM pending_links WHERE task_id = ?1",
        )
        .bind(task_id)
        .fetch_optional(self.db.as_ref())
        .await?;
        row.map(PendingRow::into_pending).transpose()
    }

    /// List all pending entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<PendingLink>> {
        let rows: Vec<PendingRow> = sqlx::query_as(
            "SELECT task_id, user_id, username, task_title, message_sent, tracking_link
             FROM pending_links ORDER BY message_sent ASC",
        )
        .fetch_all(self.db.as_ref())
        .await?;
        rows.into_iter().map(PendingRow::into_pending).collect()
    }

    /// Delete the pending entry for a task. Returns whether a row existed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the delete fails.
    pub async fn delete(&self, task_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM pending_links WHERE task_id = ?1")
            .bind(task_id)
            .execute(self.db.as_ref())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
