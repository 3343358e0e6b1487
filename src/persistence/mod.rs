//! Persistence layer modules.

pub mod admin_repo;
pub mod db;
pub mod pending_repo;
pub mod schema;
pub mod task_repo;
pub mod tracking_repo;
pub mod user_repo;

/// Re-export the database pool type for convenience.
pub use sqlx::SqlitePool;
