//! Unit tests for the dialog store and the task-creation wizard.

use std::time::Duration;

use trafficdesk::dialog::{
    advance_wizard, DialogMode, DialogStore, TaskDraft, WizardInput, WizardOutcome, WizardStep,
};
use trafficdesk::models::task::TaskKind;

fn drive(step: WizardStep, draft: &mut TaskDraft, input: WizardInput<'_>) -> WizardOutcome {
    advance_wizard(step, draft, input)
}

#[test]
fn wizard_happy_path_builds_a_complete_draft() {
    let mut draft = TaskDraft::default();

    assert_eq!(
        drive(WizardStep::Title, &mut draft, WizardInput::Text("Grow channel")),
        WizardOutcome::Advanced(WizardStep::Description)
    );
    assert_eq!(
        drive(
            WizardStep::Description,
            &mut draft,
            WizardInput::Text("Bring real subscribers")
        ),
        WizardOutcome::Advanced(WizardStep::Kind)
    );
    assert_eq!(
        drive(
            WizardStep::Kind,
            &mut draft,
            WizardInput::Kind(TaskKind::Subscribers)
        ),
        WizardOutcome::Advanced(WizardStep::Target)
    );
    assert_eq!(
        drive(WizardStep::Target, &mut draft, WizardInput::Text("1000 subscribers")),
        WizardOutcome::Advanced(WizardStep::Reward)
    );
    assert_eq!(
        drive(WizardStep::Reward, &mut draft, WizardInput::Text("250.5")),
        WizardOutcome::Advanced(WizardStep::Requirements)
    );

    let outcome = drive(
        WizardStep::Requirements,
        &mut draft,
        WizardInput::Text("no bots"),
    );
    let WizardOutcome::Finished(task) = outcome else {
        panic!("expected a finished draft");
    };
    assert_eq!(task.title, "Grow channel");
    assert_eq!(task.description, "Bring real subscribers");
    assert_eq!(task.kind, TaskKind::Subscribers);
    assert_eq!(task.target, "1000 subscribers");
    assert!((task.reward - 250.5).abs() < f64::EPSILON);
    assert_eq!(task.requirements, "no bots");
}

#[test]
fn unparseable_reward_reprompts_without_advancing() {
    let mut draft = TaskDraft::default();
    assert_eq!(
        drive(WizardStep::Reward, &mut draft, WizardInput::Text("lots")),
        WizardOutcome::Reprompt(WizardStep::Reward)
    );
    assert!(draft.reward.is_none());
}

#[test]
fn non_positive_reward_reprompts() {
    let mut draft = TaskDraft::default();
    assert_eq!(
        drive(WizardStep::Reward, &mut draft, WizardInput::Text("0")),
        WizardOutcome::Reprompt(WizardStep::Reward)
    );
    assert_eq!(
        drive(WizardStep::Reward, &mut draft, WizardInput::Text("-5")),
        WizardOutcome::Reprompt(WizardStep::Reward)
    );
}

#[test]
fn text_on_kind_step_reprompts() {
    let mut draft = TaskDraft::default();
    assert_eq!(
        drive(WizardStep::Kind, &mut draft, WizardInput::Text("clicks")),
        WizardOutcome::Reprompt(WizardStep::Kind)
    );
}

#[test]
fn button_on_text_step_reprompts() {
    let mut draft = TaskDraft::default();
    assert_eq!(
        drive(WizardStep::Title, &mut draft, WizardInput::Kind(TaskKind::Other)),
        WizardOutcome::Reprompt(WizardStep::Title)
    );
}

#[tokio::test]
async fn store_set_get_clear_roundtrip() {
    let store = DialogStore::new(Duration::from_secs(60));
    assert!(store.get("U1").await.is_none());

    store.set("U1", DialogMode::AwaitingAdminId).await;
    assert_eq!(store.get("U1").await, Some(DialogMode::AwaitingAdminId));

    store.clear("U1").await;
    assert!(store.get("U1").await.is_none());
}

#[tokio::test]
async fn new_mode_replaces_previous_mode() {
    let store = DialogStore::new(Duration::from_secs(60));
    store.set("U1", DialogMode::AwaitingAdminId).await;
    store
        .set(
            "U1",
            DialogMode::AwaitingProof {
                task_id: "t1".into(),
            },
        )
        .await;
    assert_eq!(
        store.get("U1").await,
        Some(DialogMode::AwaitingProof {
            task_id: "t1".into()
        })
    );
}

#[tokio::test]
async fn expired_entry_is_dropped_on_access() {
    let store = DialogStore::new(Duration::from_millis(10));
    store.set("U1", DialogMode::AwaitingAdminId).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(store.get("U1").await.is_none());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn prune_removes_only_expired_entries() {
    let store = DialogStore::new(Duration::from_millis(50));
    store.set("old", DialogMode::AwaitingAdminId).await;
    tokio::time::sleep(Duration::from_millis(80)).await;
    store.set("fresh", DialogMode::AwaitingAdminId).await;

    let removed = store.prune().await;
    assert_eq!(removed, 1);
    assert_eq!(store.len().await, 1);
    assert!(store.get("fresh").await.is_some());
}
