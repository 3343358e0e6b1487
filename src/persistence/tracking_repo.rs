//! Tracking link repository for `SQLite` persistence.

use std::sync::Arc;

use chrono::Utc;

use crate::models::tracking::TrackingLink;
use crate::{AppError, Result};

use super::db::Database;

/// Repository for tracking link records.
#[derive(Clone)]
pub struct TrackingRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct TrackingRow {
    link_id: String,
    user_id: String,
    task_id: String,
    created: String,
    clicks: i64,
    conversions: i64,
    active: i64,
    work_link: Option<String>,
}

impl TrackingRow {
    fn into_link(self) -> Result<TrackingLink> {
        let created = chrono::DateTime::parse_from_rfc3339(&self.created)
            .map_err(|e| AppError::Db(format!("invalid created: {e}")))?
            .with_timezone(&Utc);
        Ok(TrackingLink {
            link_id: self.link_id,
            user_id: self.user_id,
            task_id: self.task_id,
            created,
            clicks: self.clicks,
            conversions: self.conversions,
            active: self.active != 0,
            work_link: self.work_link,
        })
    }
}

impl TrackingRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a tracking link row with a zeroed click counter unless the
    /// identifier is already taken.
    ///
    /// Returns `true` when the row was created; `false` signals an id
    /// collision and the caller should regenerate.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insert fails.
    pub async fn insert_if_absent(
        &self,
        link_id: &str,
        user_id: &str,
        task_id: &str,
    ) -> Result<bool> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO tracking_links (link_id, user_id, task_id, created, clicks, conversions, active)
             VALUES (?1, ?2, ?3, ?4, 0, 0, 1)
             ON CONFLICT (link_id) DO NOTHING",
        )
        .bind(link_id)
        .bind(user_id)
        .bind(task_id)
        .bind(&now)
        .execute(self.db.as_ref())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch a tracking link by identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get(&self, link_id: &str) -> Result<Option<TrackingLink>> {
        let row: Option<TrackingRow> = sqlx::query_as(
            "SELECT link_id, user_id, task_id, created, clicks, conversions, active, work_link
             FROM tracking_links WHERE link_id = ?1",
        )
        .bind(link_id)
        .fetch_optional(self.db.as_ref())
        .await?;
        row.map(TrackingRow::into_link).transpose()
    }

    /// Bump the click counter for a link.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the update fails.
    pub async fn increment_clicks(&self, link_id: &str) -> Result<()> {
        sqlx::query("UPDATE tracking_links SET clicks = clicks + 1 WHERE link_id = ?1")
            .bind(link_id)
            .execute(self.db.as_ref())
            .await?;
        Ok(())
    }
}
