//! Unit tests for `UserRepo`.

use std::sync::Arc;

use trafficdesk::persistence::{db, user_repo::UserRepo};
use trafficdesk::AppError;

#[tokio::test]
async fn insert_is_idempotent() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let repo = UserRepo::new(db);

    assert!(repo.insert_if_absent("U1", "jo", "Jo").await.expect("first"));
    assert!(!repo.insert_if_absent("U1", "other", "Other").await.expect("second"));

    let user = repo.get("U1").await.expect("get").expect("present");
    assert_eq!(user.username, "jo");
    assert_eq!(user.first_name, "Jo");
    assert!(user.earned.abs() < f64::EPSILON);
}

#[tokio::test]
async fn missing_user_is_none() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let repo = UserRepo::new(db);
    assert!(repo.get("nobody").await.expect("get").is_none());
}

#[tokio::test]
async fn add_earned_accumulates() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let repo = UserRepo::new(db);

    repo.insert_if_absent("U1", "jo", "Jo").await.expect("insert");
    repo.add_earned("U1", 10.0).await.expect("first credit");
    repo.add_earned("U1", 2.5).await.expect("second credit");

    let user = repo.get("U1").await.expect("get").expect("present");
    assert!((user.earned - 12.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn negative_credit_is_rejected() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let repo = UserRepo::new(db);

    repo.insert_if_absent("U1", "jo", "Jo").await.expect("insert");
    let err = repo.add_earned("U1", -1.0).await.expect_err("must fail");
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn count_and_top_earners() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let repo = UserRepo::new(db);

    repo.insert_if_absent("U1", "a", "A").await.expect("u1");
    repo.insert_if_absent("U2", "b", "B").await.expect("u2");
    repo.insert_if_absent("U3", "c", "C").await.expect("u3");
    repo.add_earned("U1", 5.0).await.expect("c1");
    repo.add_earned("U2", 50.0).await.expect("c2");

    assert_eq!(repo.count().await.expect("count"), 3);

    let top = repo.top_earners(10).await.expect("top");
    let ids: Vec<&str> = top.iter().map(|u| u.user_id.as_str()).collect();
    // Highest first; zero earners are excluded.
    assert_eq!(ids, vec!["U2", "U1"]);
}
