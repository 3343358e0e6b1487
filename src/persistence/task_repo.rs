//! Task repository for `SQLite` persistence.
//!
//! Assignment and completion are the two consistency-critical writes.
//! Assignment serializes concurrent claims through a single conditional
//! `UPDATE`; completion runs the task flip, the user-task status flip,
//! and the payout credit in one transaction so a failure between them
//! can neither lose nor double the payout.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::task::{Task, TaskKind};
use crate::models::user_task::{UserTask, UserTaskStatus};
use crate::{AppError, Result};

use super::db::Database;

/// Repository for task records and their user-task links.
#[derive(Clone)]
pub struct TaskRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct TaskRow {
    task_id: String,
    title: String,
    description: String,
    #[sqlx(rename = "type")]
    kind: String,
    target: String,
    reward: f64,
    requirements: String,
    created_by: String,
    created_date: String,
    active: i64,
    taken_by: Option<String>,
    assigned_date: Option<String>,
    completed: i64,
    completed_date: Option<String>,
    proof: Option<String>,
    work_link: Option<String>,
    available: i64,
}

const TASK_COLUMNS: &str = "task_id, title, description, type, target, reward, requirements, \
     created_by, created_date, active, taken_by, assigned_date, completed, \
     completed_date, proof, work_link, available";

fn parse_ts(value: &str, field: &str) -> Result<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| AppError::Db(format!("invalid {field}: {e}")))
}

fn parse_opt_ts(value: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>> {
    value.map(|v| parse_ts(v, field)).transpose()
}

impl TaskRow {
    fn into_task(self) -> Result<Task> {
        let kind = TaskKind::parse(&self.kind)
            .ok_or_else(|| AppError::Db(format!("invalid task type: {}", self.kind)))?;
        Ok(Task {
            task_id: self.task_id,
            title: self.title,
            description: self.description,
            kind,
            target: self.target,
            reward: self.reward,
            requirements: self.requirements,
            created_by: self.created_by,
            created_date: parse_ts(&self.created_date, "created_date")?,
            active: self.active != 0,
            taken_by: self.taken_by,
            assigned_date: parse_opt_ts(self.assigned_date.as_deref(), "assigned_date")?,
            completed: self.completed != 0,
            completed_date: parse_opt_ts(self.completed_date.as_deref(), "completed_date")?,
            proof: self.proof,
            work_link: self.work_link,
            available: self.available != 0,
        })
    }
}

/// Internal row struct for `user_tasks` deserialization.
#[derive(sqlx::FromRow)]
struct UserTaskRow {
    user_id: String,
    task_id: String,
    status: String,
    taken_date: String,
    completed_date: Option<String>,
}

impl UserTaskRow {
    fn into_link(self) -> Result<UserTask> {
        let status = UserTaskStatus::parse(&self.status)
            .ok_or_else(|| AppError::Db(format!("invalid user_task status: {}", self.status)))?;
        Ok(UserTask {
            user_id: self.user_id,
            task_id: self.task_id,
            status,
            taken_date: parse_ts(&self.taken_date, "taken_date")?,
            completed_date: parse_opt_ts(self.completed_date.as_deref(), "completed_date")?,
        })
    }
}

impl TaskRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a task row unless the identifier is already taken.
    ///
    /// Returns `true` when the row was created; `false` signals an id
    /// collision and the caller should regenerate.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insert fails.
    pub async fn insert_if_absent(&self, task: &Task) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO tasks (task_id, title, description, type, target, reward,
                 requirements, created_by, created_date, active, available)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, 1)
             ON CONFLICT (task_id) DO NOTHING",
        )
        .bind(&task.task_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.kind.as_str())
        .bind(&task.target)
        .bind(task.reward)
        .bind(&task.requirements)
        .bind(&task.created_by)
        .bind(task.created_date.to_rfc3339())
        .execute(self.db.as_ref())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get(&self, task_id: &str) -> Result<Option<Task>> {
        let row: Option<TaskRow> =
            sqlx::query_as(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE task_id = ?1"))
                .bind(task_id)
                .fetch_optional(self.db.as_ref())
                .await?;
        row.map(TaskRow::into_task).transpose()
    }

    /// List claimable tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_available(&self) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE available = 1 AND active = 1 AND taken_by IS NULL
             ORDER BY created_date DESC"
        ))
        .fetch_all(self.db.as_ref())
        .await?;
        rows.into_iter().map(TaskRow::into_task).collect()
    }

    /// Atomically claim a task for a user.
    ///
    /// The conditional `UPDATE` is the sole serialization point for
    /// concurrent claims — exactly one caller observes `true` for a
    /// never-assigned task. On success the `user_tasks` link row is
    /// upserted with status `active` in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if any statement fails.
    pub async fn try_assign(&self, task_id: &str, user_id: &str) -> Result<bool> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.db.begin().await?;

        let claimed = sqlx::query(
            "UPDATE tasks SET taken_by = ?1, available = 0, assigned_date = ?2
             WHERE task_id = ?3 AND available = 1 AND taken_by IS NULL",
        )
        .bind(user_id)
        .bind(&now)
        .bind(task_id)
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO user_tasks (user_id, task_id, status, taken_date)
             VALUES (?1, ?2, 'active', ?3)
             ON CONFLICT (user_id, task_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(task_id)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Store the admin-supplied work link. Returns whether a row was
    /// affected.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the update fails.
    pub async fn set_work_link(&self, task_id: &str, link: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE tasks SET work_link = ?1 WHERE task_id = ?2")
            .bind(link)
            .bind(task_id)
            .execute(self.db.as_ref())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Complete a task and credit the payout.
    ///
    /// Succeeds only if `user_id` is the current assignee of a
    /// not-yet-completed task. The task flip, the user-task status flip,
    /// and the earnings credit commit together or not at all.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if any statement fails.
    pub async fn complete(&self, task_id: &str, user_id: &str, proof: &str) -> Result<bool> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.db.begin().await?;

        let reward: Option<(f64,)> = sqlx::query_as(
            "SELECT reward FROM tasks
             WHERE task_id = ?1 AND taken_by = ?2 AND completed = 0",
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((reward,)) = reward else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query(
            "UPDATE tasks SET completed = 1, active = 0, completed_date = ?1, proof = ?2
             WHERE task_id = ?3",
        )
        .bind(&now)
        .bind(proof)
        .bind(task_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE user_tasks SET status = 'completed', completed_date = ?1
             WHERE user_id = ?2 AND task_id = ?3",
        )
        .bind(&now)
        .bind(user_id)
        .bind(task_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET earned = earned + ?1 WHERE user_id = ?2")
            .bind(reward)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Fetch the user-task link for a (user, task) pair.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get_user_task(&self, user_id: &str, task_id: &str) -> Result<Option<UserTask>> {
        let row: Option<UserTaskRow> = sqlx::query_as(
            "SELECT user_id, task_id, status, taken_date, completed_date
             FROM user_tasks WHERE user_id = ?1 AND task_id = ?2",
        )
        .bind(user_id)
        .bind(task_id)
        .fetch_optional(self.db.as_ref())
        .await?;
        row.map(UserTaskRow::into_link).transpose()
    }

    /// List a user's tasks whose link has the given status, most recent
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        status: UserTaskStatus,
    ) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            "SELECT t.task_id, t.title, t.description, t.type, t.target, t.reward,
                    t.requirements, t.created_by, t.created_date, t.active, t.taken_by,
                    t.assigned_date, t.completed, t.completed_date, t.proof, t.work_link,
                    t.available
             FROM tasks t
             JOIN user_tasks ut ON t.task_id = ut.task_id
             WHERE ut.user_id = ?1 AND ut.status = ?2
             ORDER BY ut.taken_date DESC",
        )
        .bind(user_id)
        .bind(status.as_str())
        .fetch_all(self.db.as_ref())
        .await?;
        rows.into_iter().map(TaskRow::into_task).collect()
    }

    /// List the most recently created tasks for the admin overview.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_date DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(self.db.as_ref())
        .await?;
        rows.into_iter().map(TaskRow::into_task).collect()
    }

    /// List tasks completed inside the `[start, end)` window.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn completed_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE completed = 1 AND completed_date >= ?1 AND completed_date < ?2"
        ))
        .bind(start.to_rfc3339())
        .bind(end.to_rfc3339())
        .fetch_all(self.db.as_ref())
        .await?;
        rows.into_iter().map(TaskRow::into_task).collect()
    }

    /// Aggregate counters for the admin statistics screen:
    /// (total, `in_progress`, completed, total payout).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn overview_counts(&self) -> Result<(i64, i64, i64, f64)> {
        let row: (i64, i64, i64, f64) = sqlx::query_as(
            "SELECT COUNT(*),
                    COUNT(CASE WHEN active = 1 AND taken_by IS NOT NULL THEN 1 END),
                    COUNT(CASE WHEN completed = 1 THEN 1 END),
                    COALESCE(SUM(CASE WHEN completed = 1 THEN reward END), 0)
             FROM tasks",
        )
        .fetch_one(self.db.as_ref())
        .await?;
        Ok(row)
    }

    /// Count distinct users that ever took a task.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn count_distinct_workers(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(DISTINCT user_id) FROM user_tasks")
            .fetch_one(self.db.as_ref())
            .await?;
        Ok(count.0)
    }

    /// Best performer inside the `[start, end)` window: the user with the
    /// highest sum of completed rewards, if anyone completed anything.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn top_performer_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<(String, f64)>> {
        let row: Option<(String, f64)> = sqlx::query_as(
            "SELECT ut.user_id, SUM(t.reward) AS total
             FROM user_tasks ut
             JOIN tasks t ON ut.task_id = t.task_id
             WHERE ut.status = 'completed'
               AND ut.completed_date >= ?1 AND ut.completed_date < ?2
             GROUP BY ut.user_id
             ORDER BY total DESC
             LIMIT 1",
        )
        .bind(start.to_rfc3339())
        .bind(end.to_rfc3339())
        .fetch_optional(self.db.as_ref())
        .await?;
        Ok(row)
    }
}
