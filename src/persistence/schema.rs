//! `SQLite` schema bootstrap logic.
//!
//! All table definitions use `CREATE TABLE IF NOT EXISTS` — safe to
//! re-run on every server startup. Produces a convergent result.

use sqlx::SqlitePool;

use crate::Result;

/// Apply all table definitions to the connected `SQLite` database.
///
/// Creates all six tables idempotently. Safe to call on every startup.
///
/// # Errors
///
/// Returns `AppError::Db` if any DDL statement fails.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS users (
    user_id         TEXT PRIMARY KEY NOT NULL,
    username        TEXT NOT NULL DEFAULT '',
    first_name      TEXT NOT NULL DEFAULT '',
    joined_date     TEXT NOT NULL,
    earned          REAL NOT NULL DEFAULT 0,
    rating          INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS admins (
    user_id         TEXT PRIMARY KEY NOT NULL,
    username        TEXT NOT NULL DEFAULT '',
    added_by        TEXT,
    added_date      TEXT NOT NULL,
    permissions     TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS tasks (
    task_id         TEXT PRIMARY KEY NOT NULL,
    title           TEXT NOT NULL,
    description     TEXT NOT NULL,
    type            TEXT NOT NULL CHECK(type IN ('subscribers','ad_post','clicks','app_install','other')),
    target          TEXT NOT NULL,
    reward          REAL NOT NULL,
    requirements    TEXT NOT NULL DEFAULT '',
    created_by      TEXT NOT NULL,
    created_date    TEXT NOT NULL,
    active          INTEGER NOT NULL DEFAULT 1,
    taken_by        TEXT,
    assigned_date   TEXT,
    completed       INTEGER NOT NULL DEFAULT 0,
    completed_date  TEXT,
    proof           TEXT,
    work_link       TEXT,
    available       INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS user_tasks (
    user_id         TEXT NOT NULL,
    task_id         TEXT NOT NULL,
    status          TEXT NOT NULL CHECK(status IN ('active','completed')),
    taken_date      TEXT NOT NULL,
    completed_date  TEXT,
    PRIMARY KEY (user_id, task_id)
);

CREATE TABLE IF NOT EXISTS tracking_links (
    link_id         TEXT PRIMARY KEY NOT NULL,
    user_id         TEXT NOT NULL,
    task_id         TEXT NOT NULL,
    created         TEXT NOT NULL,
    clicks          INTEGER NOT NULL DEFAULT 0,
    conversions     INTEGER NOT NULL DEFAULT 0,
    active          INTEGER NOT NULL DEFAULT 1,
    work_link       TEXT
);

CREATE TABLE IF NOT EXISTS pending_links (
    task_id         TEXT PRIMARY KEY NOT NULL,
    user_id         TEXT NOT NULL,
    username        TEXT NOT NULL DEFAULT '',
    task_title      TEXT NOT NULL DEFAULT '',
    message_sent    TEXT NOT NULL,
    tracking_link   TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_tasks_available ON tasks(available, active);
CREATE INDEX IF NOT EXISTS idx_user_tasks_user ON user_tasks(user_id, status);
CREATE INDEX IF NOT EXISTS idx_tracking_task ON tracking_links(task_id);
";

    sqlx::raw_sql(ddl).execute(pool).await?;
    Ok(())
}
