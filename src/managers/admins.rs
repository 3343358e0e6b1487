//! Admin manager.
//!
//! Privilege checks are re-run immediately before every privileged
//! operation — never cached, never trusted from prior state. The main
//! admin identity is fixed by configuration, never stored in the admin
//! table, and never removable.

use std::sync::Arc;

use tracing::info;

use crate::models::admin::{default_permissions, Admin};
use crate::persistence::admin_repo::AdminRepo;
use crate::persistence::db::Database;
use crate::{AppError, Result};

/// Manager for admin privilege records.
#[derive(Clone)]
pub struct AdminManager {
    repo: AdminRepo,
    main_admin_id: String,
}

impl AdminManager {
    /// Create a manager bound to the given store client and the
    /// configuration-fixed main admin identity.
    #[must_use]
    pub fn new(db: Arc<Database>, main_admin_id: impl Into<String>) -> Self {
        Self {
            repo: AdminRepo::new(db),
            main_admin_id: main_admin_id.into(),
        }
    }

    /// Whether `user_id` holds admin privileges.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the lookup fails.
    pub async fn is_admin(&self, user_id: &str) -> Result<bool> {
        if self.is_main_admin(user_id) {
            return Ok(true);
        }
        self.repo.exists(user_id).await
    }

    /// Whether `user_id` is the main admin. Exact equality only.
    #[must_use]
    pub fn is_main_admin(&self, user_id: &str) -> bool {
        user_id == self.main_admin_id
    }

    /// The configuration-fixed main admin identity.
    #[must_use]
    pub fn main_admin_id(&self) -> &str {
        &self.main_admin_id
    }

    /// Fail with `AppError::Unauthorized` unless `user_id` is an admin.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` for non-admins, `AppError::Db`
    /// if the lookup fails.
    pub async fn ensure_admin(&self, user_id: &str) -> Result<()> {
        if self.is_admin(user_id).await? {
            Ok(())
        } else {
            Err(AppError::Unauthorized("admin privileges required".into()))
        }
    }

    /// Fail with `AppError::Unauthorized` unless `user_id` is the main
    /// admin.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` for everyone else.
    pub fn ensure_main_admin(&self, user_id: &str) -> Result<()> {
        if self.is_main_admin(user_id) {
            Ok(())
        } else {
            Err(AppError::Unauthorized(
                "main admin privileges required".into(),
            ))
        }
    }

    /// Grant admin privileges with the default permission set.
    ///
    /// Idempotent — a second call for the same user is a no-op. The main
    /// admin is never written to the table.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insert fails.
    pub async fn add_admin(
        &self,
        user_id: &str,
        username: &str,
        added_by: &str,
    ) -> Result<()> {
        if self.is_main_admin(user_id) {
            return Ok(());
        }
        self.repo
            .insert_if_absent(user_id, username, Some(added_by), &default_permissions())
            .await?;
        info!(user_id, added_by, "admin granted");
        Ok(())
    }

    /// Revoke admin privileges. Always fails for the main admin.
    ///
    /// Returns whether a record was actually removed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the delete fails.
    pub async fn remove_admin(&self, user_id: &str) -> Result<bool> {
        if self.is_main_admin(user_id) {
            return Ok(false);
        }
        let removed = self.repo.delete(user_id).await?;
        if removed {
            info!(user_id, "admin revoked");
        }
        Ok(removed)
    }

    /// List all stored admin records (the main admin is not among them).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_admins(&self) -> Result<Vec<Admin>> {
        self.repo.list_all().await
    }
}
