//! Unit tests for `UserManager` statistics.

use std::sync::Arc;

use trafficdesk::managers::{tasks::TaskManager, users::UserManager};
use trafficdesk::models::task::{NewTask, TaskKind};
use trafficdesk::models::user::rating_for;
use trafficdesk::persistence::db;

fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_owned(),
        description: "desc".to_owned(),
        kind: TaskKind::Subscribers,
        target: "100".to_owned(),
        reward: 10.0,
        requirements: "-".to_owned(),
    }
}

#[test]
fn rating_is_ten_per_completed_task() {
    assert_eq!(rating_for(0), 0);
    assert_eq!(rating_for(1), 10);
    assert_eq!(rating_for(4), 40);
}

#[tokio::test]
async fn stats_for_unknown_user_are_zero() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let users = UserManager::new(db);

    let stats = users.stats("nobody").await.expect("stats");
    assert_eq!(stats.completed_count, 0);
    assert_eq!(stats.active_count, 0);
    assert!(stats.total_earned.abs() < f64::EPSILON);
    assert_eq!(stats.rating, 0);
}

#[tokio::test]
async fn stats_track_the_task_lifecycle() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let users = UserManager::new(Arc::clone(&db));
    let tasks = TaskManager::new(db);

    users.get_or_create("U1", "jo", "Jo").await.expect("user");
    let t1 = tasks.create(new_task("one"), "U0MAIN").await.expect("t1");
    let t2 = tasks.create(new_task("two"), "U0MAIN").await.expect("t2");
    assert!(tasks.assign(&t1, "U1").await.expect("a1"));
    assert!(tasks.assign(&t2, "U1").await.expect("a2"));
    assert!(tasks.complete(&t1, "U1", "proof").await.expect("c1"));

    let stats = users.stats("U1").await.expect("stats");
    assert_eq!(stats.completed_count, 1);
    assert_eq!(stats.active_count, 1);
    assert!((stats.total_earned - 10.0).abs() < f64::EPSILON);
    assert_eq!(stats.rating, 10);
}

#[tokio::test]
async fn get_or_create_registers_once() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let users = UserManager::new(db);

    users.get_or_create("U1", "jo", "Jo").await.expect("first");
    users.get_or_create("U1", "changed", "Changed").await.expect("second");

    let user = users.get("U1").await.expect("get").expect("present");
    assert_eq!(user.username, "jo");
    assert_eq!(users.count().await.expect("count"), 1);
}
