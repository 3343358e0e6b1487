//! Unit tests for database connection and schema bootstrap.

use std::sync::Arc;

use trafficdesk::persistence::{db, user_repo::UserRepo};

#[tokio::test]
async fn connect_creates_the_file_and_schema() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("trafficdesk.db");
    let path_str = path.to_string_lossy().to_string();

    let pool = db::connect(&path_str).await.expect("connect");
    assert!(path.exists());

    let repo = UserRepo::new(Arc::new(pool));
    assert!(repo.insert_if_absent("U1", "jo", "Jo").await.expect("insert"));
}

#[tokio::test]
async fn bootstrap_is_idempotent_across_reconnects() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("trafficdesk.db");
    let path_str = path.to_string_lossy().to_string();

    {
        let pool = db::connect(&path_str).await.expect("first connect");
        let repo = UserRepo::new(Arc::new(pool));
        repo.insert_if_absent("U1", "jo", "Jo").await.expect("insert");
    }

    // Second connect re-runs the DDL and keeps existing data.
    let pool = db::connect(&path_str).await.expect("second connect");
    let repo = UserRepo::new(Arc::new(pool));
    assert!(!repo.insert_if_absent("U1", "jo", "Jo").await.expect("still there"));
}
