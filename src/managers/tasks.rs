//! Task lifecycle manager.
//!
//! Task creation → availability → assignment → link issuance → proof
//! submission → completion → payout. The task is the aggregate root;
//! user-task links, tracking links, and pending link requests must stay
//! consistent with its assignment/completion state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::ids;
use crate::models::task::{NewTask, Task};
use crate::models::user_task::{UserTask, UserTaskStatus};
use crate::persistence::db::Database;
use crate::persistence::task_repo::TaskRepo;
use crate::{AppError, Result};

/// Bounded retries for short-id collisions at insert time.
const MAX_ID_ATTEMPTS: usize = 5;

/// Manager for task records and the task state machine.
#[derive(Clone)]
pub struct TaskManager {
    repo: TaskRepo,
}

impl TaskManager {
    /// Create a manager bound to the given store client.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            repo: TaskRepo::new(db),
        }
    }

    /// Create a new task and return its generated identifier.
    ///
    /// The short id is derived from the title and creation timestamp;
    /// uniqueness is verified at insert time and the id is regenerated
    /// on conflict.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an empty title or non-positive
    /// reward, `AppError::Conflict` if the insert keeps colliding, and
    /// `AppError::Db` if it fails outright.
    pub async fn create(&self, new_task: NewTask, created_by: &str) -> Result<String> {
        if new_task.title.trim().is_empty() {
            return Err(AppError::Validation("task title must not be empty".into()));
        }
        if new_task.reward <= 0.0 {
            return Err(AppError::Validation("task reward must be positive".into()));
        }

        let created_date = Utc::now();
        let seed = ids::task_seed(&new_task.title, &created_date.to_rfc3339());

        for _ in 0..MAX_ID_ATTEMPTS {
            let task = Task {
                task_id: ids::short_id(&seed),
                title: new_task.title.clone(),
                description: new_task.description.clone(),
                kind: new_task.kind,
                target: new_task.target.clone(),
                reward: new_task.reward,
                requirements: new_task.requirements.clone(),
                created_by: created_by.to_owned(),
                created_date,
                active: true,
                taken_by: None,
                assigned_date: None,
                completed: false,
                completed_date: None,
                proof: None,
                work_link: None,
                available: true,
            };
            if self.repo.insert_if_absent(&task).await? {
                info!(task_id = %task.task_id, title = %task.title, "task created");
                return Ok(task.task_id);
            }
        }

        Err(AppError::Conflict(format!(
            "could not generate a unique task id after {MAX_ID_ATTEMPTS} attempts"
        )))
    }

    /// List claimable tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_available(&self) -> Result<Vec<Task>> {
        self.repo.list_available().await
    }

    /// Fetch a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get(&self, task_id: &str) -> Result<Option<Task>> {
        self.repo.get(task_id).await
    }

    /// Claim a task for a user. Exactly one concurrent caller wins.
    ///
    /// Returns `false` when the task was already taken or is no longer
    /// available.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store update fails.
    pub async fn assign(&self, task_id: &str, user_id: &str) -> Result<bool> {
        let claimed = self.repo.try_assign(task_id, user_id).await?;
        if claimed {
            info!(task_id, user_id, "task assigned");
        }
        Ok(claimed)
    }

    /// Store the admin-supplied work link. Returns whether the task
    /// existed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the update fails.
    pub async fn set_work_link(&self, task_id: &str, link: &str) -> Result<bool> {
        self.repo.set_work_link(task_id, link).await
    }

    /// Complete a task with proof and credit the reward to the assignee.
    ///
    /// Returns `false` unless `user_id` is the current assignee of a
    /// not-yet-completed task. The completion flip and the payout credit
    /// are atomic together.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the store update fails.
    pub async fn complete(&self, task_id: &str, user_id: &str, proof: &str) -> Result<bool> {
        let done = self.repo.complete(task_id, user_id, proof).await?;
        if done {
            info!(task_id, user_id, "task completed and payout credited");
        }
        Ok(done)
    }

    /// Fetch the user-task link for a (user, task) pair.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get_user_task(&self, user_id: &str, task_id: &str) -> Result<Option<UserTask>> {
        self.repo.get_user_task(user_id, task_id).await
    }

    /// List a user's in-progress tasks.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_active_for_user(&self, user_id: &str) -> Result<Vec<Task>> {
        self.repo.list_for_user(user_id, UserTaskStatus::Active).await
    }

    /// List a user's completed tasks, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_completed_for_user(&self, user_id: &str) -> Result<Vec<Task>> {
        self.repo
            .list_for_user(user_id, UserTaskStatus::Completed)
            .await
    }

    /// List the most recently created tasks.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<Task>> {
        self.repo.list_recent(limit).await
    }

    /// Aggregate counters for the admin statistics screen:
    /// (total, `in_progress`, completed, total payout).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn overview_counts(&self) -> Result<(i64, i64, i64, f64)> {
        self.repo.overview_counts().await
    }

    /// Count distinct users that ever took a task.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn count_distinct_workers(&self) -> Result<i64> {
        self.repo.count_distinct_workers().await
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
        self.repo.completed_between(start, end).await
    }

    /// Best performer inside the `[start, end)` window.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn top_performer_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<(String, f64)>> {
        self.repo.top_performer_between(start, end).await
    }
}
