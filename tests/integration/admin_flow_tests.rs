//! Admin flows: privilege lifecycle and the pending work-link queue.

use std::sync::Arc;

use chrono::Utc;
use trafficdesk::managers::admins::AdminManager;
use trafficdesk::managers::links::{PendingQueue, TrackingLinks};
use trafficdesk::managers::tasks::TaskManager;
use trafficdesk::models::pending::PendingLink;
use trafficdesk::models::task::{NewTask, TaskKind};
use trafficdesk::persistence::db;

const MAIN: &str = "U0MAIN";

fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_owned(),
        description: "desc".to_owned(),
        kind: TaskKind::AdPost,
        target: "1 post".to_owned(),
        reward: 20.0,
        requirements: "-".to_owned(),
    }
}

#[tokio::test]
async fn promoted_admin_can_act_until_revoked() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let admins = AdminManager::new(Arc::clone(&db), MAIN);
    let tasks = TaskManager::new(db);

    // Promotion by the main admin.
    admins.add_admin("U7", "helper", MAIN).await.expect("grant");
    admins.ensure_admin("U7").await.expect("guard passes");

    // The new admin creates a task.
    let task_id = tasks.create(new_task("by helper"), "U7").await.expect("create");
    let task = tasks.get(&task_id).await.expect("get").expect("present");
    assert_eq!(task.created_by, "U7");

    // Revocation re-locks privileged paths immediately.
    assert!(admins.remove_admin("U7").await.expect("revoke"));
    assert!(admins.ensure_admin("U7").await.is_err());
}

#[tokio::test]
async fn pending_queue_survives_until_a_link_is_provided() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let tasks = TaskManager::new(Arc::clone(&db));
    let tracking = TrackingLinks::new(Arc::clone(&db));
    let pending = PendingQueue::new(db);

    let task_id = tasks.create(new_task("needs link"), MAIN).await.expect("create");
    assert!(tasks.assign(&task_id, "U1").await.expect("claim"));
    let link_id = tracking.generate("U1", &task_id).await.expect("tracking");

    pending
        .save(&PendingLink {
            task_id: task_id.clone(),
            user_id: "U1".to_owned(),
            username: "jo".to_owned(),
            task_title: "needs link".to_owned(),
            message_sent: Utc::now(),
            tracking_link: format!("https://example.com/bot?start={link_id}"),
        })
        .await
        .expect("queue");

    // Queue shows the entry until an admin resolves it.
    let entries = pending.list_all().await.expect("list");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].user_id, "U1");

    assert!(tasks.set_work_link(&task_id, "https://example.com/work").await.expect("store"));
    assert!(pending.delete(&task_id).await.expect("resolve"));
    assert!(pending.list_all().await.expect("empty").is_empty());

    let task = tasks.get(&task_id).await.expect("get").expect("present");
    assert_eq!(task.work_link.as_deref(), Some("https://example.com/work"));
}

#[tokio::test]
async fn tracking_clicks_accumulate_per_deep_link_visit() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let tasks = TaskManager::new(Arc::clone(&db));
    let tracking = TrackingLinks::new(db);

    let task_id = tasks.create(new_task("clicky"), MAIN).await.expect("create");
    assert!(tasks.assign(&task_id, "U1").await.expect("claim"));

    let link_id = tracking.generate("U1", &task_id).await.expect("tracking");
    tracking.increment_clicks(&link_id).await.expect("one");
    tracking.increment_clicks(&link_id).await.expect("two");

    let link = tracking.get(&link_id).await.expect("get").expect("present");
    assert_eq!(link.clicks, 2);
    assert_eq!(link.task_id, task_id);
}

#[tokio::test]
async fn reassigning_a_task_updates_its_queue_entry() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let pending = PendingQueue::new(db);

    let base = PendingLink {
        task_id: "t1".to_owned(),
        user_id: "U1".to_owned(),
        username: "jo".to_owned(),
        task_title: "t".to_owned(),
        message_sent: Utc::now(),
        tracking_link: String::new(),
    };
    pending.save(&base).await.expect("first");
    pending
        .save(&PendingLink {
            user_id: "U2".to_owned(),
            username: "max".to_owned(),
            ..base
        })
        .await
        .expect("second");

    let entry = pending.get("t1").await.expect("get").expect("present");
    assert_eq!(entry.user_id, "U2");
    assert_eq!(pending.list_all().await.expect("list").len(), 1);
}
