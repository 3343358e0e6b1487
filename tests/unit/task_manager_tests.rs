//! Unit tests for `TaskManager` creation and validation.

use std::sync::Arc;

use trafficdesk::ids::ID_LEN;
use trafficdesk::managers::tasks::TaskManager;
use trafficdesk::models::task::{NewTask, TaskKind};
use trafficdesk::persistence::db;
use trafficdesk::AppError;

fn new_task(title: &str, reward: f64) -> NewTask {
    NewTask {
        title: title.to_owned(),
        description: "desc".to_owned(),
        kind: TaskKind::AdPost,
        target: "1 post".to_owned(),
        reward,
        requirements: "-".to_owned(),
    }
}

#[tokio::test]
async fn create_returns_a_short_id_and_persists() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let tasks = TaskManager::new(db);

    let id = tasks.create(new_task("Promo", 10.0), "U0MAIN").await.expect("create");
    assert_eq!(id.len(), ID_LEN);

    let task = tasks.get(&id).await.expect("get").expect("present");
    assert_eq!(task.title, "Promo");
    assert_eq!(task.created_by, "U0MAIN");
    assert!(task.is_claimable());
}

#[tokio::test]
async fn create_rejects_empty_title() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let tasks = TaskManager::new(db);

    let err = tasks
        .create(new_task("   ", 10.0), "U0MAIN")
        .await
        .expect_err("must fail");
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn create_rejects_non_positive_reward() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let tasks = TaskManager::new(db);

    for reward in [0.0, -3.0] {
        let err = tasks
            .create(new_task("Promo", reward), "U0MAIN")
            .await
            .expect_err("must fail");
        assert!(matches!(err, AppError::Validation(_)));
    }
}

#[tokio::test]
async fn identical_titles_get_distinct_ids() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let tasks = TaskManager::new(db);

    let a = tasks.create(new_task("Promo", 10.0), "U0MAIN").await.expect("a");
    let b = tasks.create(new_task("Promo", 10.0), "U0MAIN").await.expect("b");
    assert_ne!(a, b);
    assert_eq!(tasks.list_available().await.expect("list").len(), 2);
}
