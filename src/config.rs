//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::{AppError, Result};

/// Nested Slack configuration for Socket Mode connectivity.
///
/// Tokens are loaded at runtime via OS keychain or environment variables,
/// never from the TOML config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SlackConfig {
    /// Channel where task-taken notifications are posted for admins.
    pub task_group_id: String,
    /// Channel where completion reports and daily summaries are posted.
    pub report_group_id: String,
    /// App-level token used for Socket Mode (populated at runtime).
    #[serde(skip)]
    pub app_token: String,
    /// Bot user token used for posting messages (populated at runtime).
    #[serde(skip)]
    pub bot_token: String,
}

fn default_report_hour() -> u32 {
    23
}

fn default_dialog_ttl_seconds() -> u64 {
    1800
}

fn default_db_path() -> PathBuf {
    PathBuf::from("trafficdesk.db")
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// The single immutable highest-privilege identity. Never stored in
    /// the admin table and never removable.
    pub main_admin_id: String,
    /// Public entry point used to build tracking deep links
    /// (`<bot_entry_point>?start=<token>`).
    pub bot_entry_point: String,
    /// Path to the `SQLite` database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Hour of day (UTC) at which the daily report is posted.
    #[serde(default = "default_report_hour")]
    pub report_hour: u32,
    /// Seconds of inactivity before a conversation dialog is expired.
    #[serde(default = "default_dialog_ttl_seconds")]
    pub dialog_ttl_seconds: u64,
    /// Slack connectivity settings.
    pub slack: SlackConfig,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load Slack credentials from OS keychain with env-var fallback.
    ///
    /// Tries the `trafficdesk` keyring service first, then falls back to
    /// `SLACK_APP_TOKEN` / `SLACK_BOT_TOKEN` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if neither keychain nor env vars provide
    /// the required tokens.
    pub async fn load_credentials(&mut self) -> Result<()> {
        self.slack.app_token = load_credential("slack_app_token", "SLACK_APP_TOKEN").await?;
        self.slack.bot_token = load_credential("slack_bot_token", "SLACK_BOT_TOKEN").await?;
        Ok(())
    }

    /// Build a tracking deep link for a generated link identifier.
    #[must_use]
    pub fn tracking_url(&self, link_id: &str) -> String {
        format!("{}?start={link_id}", self.bot_entry_point)
    }

    fn validate(&self) -> Result<()> {
        if self.main_admin_id.trim().is_empty() {
            return Err(AppError::Config("main_admin_id must not be empty".into()));
        }
        if self.report_hour > 23 {
            return Err(AppError::Config(
                "report_hour must be between 0 and 23".into(),
            ));
        }
        if self.slack.task_group_id.trim().is_empty() || self.slack.report_group_id.trim().is_empty()
        {
            return Err(AppError::Config(
                "task_group_id and report_group_id must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Load a single credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<String> {
    let key = keyring_key.to_owned();

    // keyring is synchronous I/O, so it runs on the blocking pool.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new("trafficdesk", &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(value),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            warn!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    env::var(env_key).map_err(|_| {
        AppError::Config(format!(
            "credential {keyring_key} not found in keychain or {env_key} env var"
        ))
    })
}
