//! End-to-end task lifecycle: create, claim, link, complete, payout.

use std::sync::Arc;

use trafficdesk::managers::links::{PendingQueue, TrackingLinks};
use trafficdesk::managers::tasks::TaskManager;
use trafficdesk::managers::users::UserManager;
use trafficdesk::models::pending::PendingLink;
use trafficdesk::persistence::db;

fn new_task(title: &str, reward: f64) -> trafficdesk::models::task::NewTask {
    trafficdesk::models::task::NewTask {
        title: title.to_owned(),
        description: "bring traffic".to_owned(),
        kind: trafficdesk::models::task::TaskKind::Clicks,
        target: "500 clicks".to_owned(),
        reward,
        requirements: "organic only".to_owned(),
    }
}

#[tokio::test]
async fn full_lifecycle_credits_the_worker() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let tasks = TaskManager::new(Arc::clone(&db));
    let users = UserManager::new(Arc::clone(&db));
    let tracking = TrackingLinks::new(Arc::clone(&db));
    let pending = PendingQueue::new(db);

    // Admin creates, worker registers and claims.
    let task_id = tasks.create(new_task("Promo", 120.0), "U0MAIN").await.expect("create");
    users.get_or_create("U1", "jo", "Jo").await.expect("register");
    assert!(tasks.assign(&task_id, "U1").await.expect("claim"));

    // Claim side effects: tracking link and pending work-link entry.
    let link_id = tracking.generate("U1", &task_id).await.expect("link");
    let task = tasks.get(&task_id).await.expect("get").expect("present");
    pending
        .save(&PendingLink {
            task_id: task_id.clone(),
            user_id: "U1".to_owned(),
            username: "jo".to_owned(),
            task_title: task.title.clone(),
            message_sent: chrono::Utc::now(),
            tracking_link: format!("https://example.com/bot?start={link_id}"),
        })
        .await
        .expect("queue");
    assert_eq!(pending.list_all().await.expect("list").len(), 1);

    // Admin provides the work link; the queue entry is resolved.
    assert!(tasks.set_work_link(&task_id, "https://example.com/work").await.expect("link"));
    assert!(pending.delete(&task_id).await.expect("resolve"));

    // Worker completes with proof; payout and stats land together.
    assert!(tasks.complete(&task_id, "U1", "https://proof").await.expect("complete"));

    let user = users.get("U1").await.expect("get").expect("present");
    assert!((user.earned - 120.0).abs() < f64::EPSILON);

    let stats = users.stats("U1").await.expect("stats");
    assert_eq!(stats.completed_count, 1);
    assert_eq!(stats.active_count, 0);
    assert_eq!(stats.rating, 10);

    // The completed task left the available pool for good.
    assert!(tasks.list_available().await.expect("available").is_empty());
}

#[tokio::test]
async fn four_completions_give_a_rating_of_forty() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let tasks = TaskManager::new(Arc::clone(&db));
    let users = UserManager::new(db);

    users.get_or_create("U1", "jo", "Jo").await.expect("register");
    for i in 0..4 {
        let id = tasks
            .create(new_task(&format!("task {i}"), 10.0), "U0MAIN")
            .await
            .expect("create");
        assert!(tasks.assign(&id, "U1").await.expect("claim"));
        assert!(tasks.complete(&id, "U1", "proof").await.expect("complete"));
    }

    let stats = users.stats("U1").await.expect("stats");
    assert_eq!(stats.completed_count, 4);
    assert_eq!(stats.rating, 40);
    assert!((stats.total_earned - 40.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn claimed_task_disappears_from_the_pool() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let tasks = TaskManager::new(db);

    let id = tasks.create(new_task("Promo", 10.0), "U0MAIN").await.expect("create");
    assert_eq!(tasks.list_available().await.expect("before").len(), 1);

    assert!(tasks.assign(&id, "U1").await.expect("claim"));
    assert!(tasks.list_available().await.expect("after").is_empty());
}
