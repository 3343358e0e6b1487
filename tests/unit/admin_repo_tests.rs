//! Unit tests for `AdminRepo`.

use std::sync::Arc;

use trafficdesk::models::admin::default_permissions;
use trafficdesk::persistence::{admin_repo::AdminRepo, db};

#[tokio::test]
async fn insert_exists_delete_roundtrip() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let repo = AdminRepo::new(db);

    assert!(!repo.exists("U1").await.expect("before"));
    repo.insert_if_absent("U1", "jo", Some("U0MAIN"), &default_permissions())
        .await
        .expect("insert");
    assert!(repo.exists("U1").await.expect("after"));

    assert!(repo.delete("U1").await.expect("delete"));
    assert!(!repo.exists("U1").await.expect("gone"));
    assert!(!repo.delete("U1").await.expect("second delete"));
}

#[tokio::test]
async fn insert_is_idempotent() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let repo = AdminRepo::new(db);

    repo.insert_if_absent("U1", "jo", None, &default_permissions())
        .await
        .expect("first");
    repo.insert_if_absent("U1", "someone_else", None, &[])
        .await
        .expect("second");

    let admins = repo.list_all().await.expect("list");
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].username, "jo");
    assert_eq!(admins[0].permissions, default_permissions());
}

#[tokio::test]
async fn list_preserves_permissions_and_provenance() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let repo = AdminRepo::new(db);

    repo.insert_if_absent("U1", "jo", Some("U0MAIN"), &default_permissions())
        .await
        .expect("insert");

    let admins = repo.list_all().await.expect("list");
    assert_eq!(admins[0].added_by.as_deref(), Some("U0MAIN"));
    assert!(admins[0].permissions.contains(&"manage_tasks".to_owned()));
}
