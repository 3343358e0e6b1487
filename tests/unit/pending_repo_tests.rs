//! Unit tests for `PendingRepo`.

use std::sync::Arc;

use chrono::{Duration, Utc};
use trafficdesk::models::pending::PendingLink;
use trafficdesk::persistence::{db, pending_repo::PendingRepo};

fn entry(task_id: &str, user_id: &str, age_minutes: i64) -> PendingLink {
    PendingLink {
        task_id: task_id.to_owned(),
        user_id: user_id.to_owned(),
        username: user_id.to_lowercase(),
        task_title: format!("task {task_id}"),
        message_sent: Utc::now() - Duration::minutes(age_minutes),
        tracking_link: format!("https://example.com/bot?start={task_id}"),
    }
}

#[tokio::test]
async fn upsert_and_get_roundtrip() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let repo = PendingRepo::new(db);

    repo.upsert(&entry("t1", "U1", 0)).await.expect("upsert");
    let loaded = repo.get("t1").await.expect("get").expect("present");
    assert_eq!(loaded.user_id, "U1");
    assert_eq!(loaded.task_title, "task t1");
}

#[tokio::test]
async fn second_upsert_replaces_entry() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let repo = PendingRepo::new(db);

    repo.upsert(&entry("t1", "U1", 0)).await.expect("first");
    repo.upsert(&entry("t1", "U2", 0)).await.expect("second");

    let entries = repo.list_all().await.expect("list");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].user_id, "U2");
}

#[tokio::test]
async fn list_is_oldest_first() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let repo = PendingRepo::new(db);

    repo.upsert(&entry("fresh", "U1", 1)).await.expect("fresh");
    repo.upsert(&entry("stale", "U2", 90)).await.expect("stale");

    let entries = repo.list_all().await.expect("list");
    let ids: Vec<&str> = entries.iter().map(|e| e.task_id.as_str()).collect();
    assert_eq!(ids, vec!["stale", "fresh"]);
}

#[tokio::test]
async fn delete_reports_presence() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let repo = PendingRepo::new(db);

    repo.upsert(&entry("t1", "U1", 0)).await.expect("upsert");
    assert!(repo.delete("t1").await.expect("first"));
    assert!(!repo.delete("t1").await.expect("second"));
    assert!(repo.get("t1").await.expect("get").is_none());
}
