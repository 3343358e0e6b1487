//! Wizard-to-store flow: a completed draft persists exactly the fields
//! the admin entered.

use std::sync::Arc;

use trafficdesk::dialog::{advance_wizard, TaskDraft, WizardInput, WizardOutcome, WizardStep};
use trafficdesk::managers::tasks::TaskManager;
use trafficdesk::models::task::TaskKind;
use trafficdesk::persistence::db;

fn finish_wizard() -> trafficdesk::models::task::NewTask {
    let mut draft = TaskDraft::default();
    let steps: [(WizardStep, WizardInput<'_>); 5] = [
        (WizardStep::Title, WizardInput::Text("Channel boost")),
        (WizardStep::Description, WizardInput::Text("Grow the channel")),
        (WizardStep::Kind, WizardInput::Kind(TaskKind::Subscribers)),
        (WizardStep::Target, WizardInput::Text("1000 subscribers")),
        (WizardStep::Reward, WizardInput::Text("300")),
    ];
    for (step, input) in steps {
        let outcome = advance_wizard(step, &mut draft, input);
        assert!(matches!(outcome, WizardOutcome::Advanced(_)));
    }
    match advance_wizard(
        WizardStep::Requirements,
        &mut draft,
        WizardInput::Text("active audience"),
    ) {
        WizardOutcome::Finished(task) => task,
        other => panic!("expected finished wizard, got {other:?}"),
    }
}

#[tokio::test]
async fn finished_wizard_persists_every_field() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let tasks = TaskManager::new(db);

    let new_task = finish_wizard();
    let task_id = tasks.create(new_task, "U0MAIN").await.expect("create");

    let task = tasks.get(&task_id).await.expect("get").expect("present");
    assert_eq!(task.title, "Channel boost");
    assert_eq!(task.description, "Grow the channel");
    assert_eq!(task.kind, TaskKind::Subscribers);
    assert_eq!(task.target, "1000 subscribers");
    assert!((task.reward - 300.0).abs() < f64::EPSILON);
    assert_eq!(task.requirements, "active audience");
    assert_eq!(task.created_by, "U0MAIN");
    assert!(task.is_claimable());
}

#[tokio::test]
async fn rejected_reward_does_not_leak_into_the_store() {
    let db = Arc::new(db::connect_memory().await.expect("db"));
    let tasks = TaskManager::new(db);

    let mut draft = TaskDraft::default();
    let _ = advance_wizard(WizardStep::Title, &mut draft, WizardInput::Text("t"));
    let _ = advance_wizard(WizardStep::Description, &mut draft, WizardInput::Text("d"));
    let _ = advance_wizard(WizardStep::Kind, &mut draft, WizardInput::Kind(TaskKind::Other));
    let _ = advance_wizard(WizardStep::Target, &mut draft, WizardInput::Text("x"));

    // Two bad rewards, then a good one.
    assert_eq!(
        advance_wizard(WizardStep::Reward, &mut draft, WizardInput::Text("free")),
        WizardOutcome::Reprompt(WizardStep::Reward)
    );
    assert_eq!(
        advance_wizard(WizardStep::Reward, &mut draft, WizardInput::Text("-10")),
        WizardOutcome::Reprompt(WizardStep::Reward)
    );
    assert_eq!(
        advance_wizard(WizardStep::Reward, &mut draft, WizardInput::Text("15")),
        WizardOutcome::Advanced(WizardStep::Requirements)
    );

    let outcome = advance_wizard(WizardStep::Requirements, &mut draft, WizardInput::Text("-"));
    let WizardOutcome::Finished(new_task) = outcome else {
        panic!("expected finished wizard");
    };

    let task_id = tasks.create(new_task, "U0MAIN").await.expect("create");
    let task = tasks.get(&task_id).await.expect("get").expect("present");
    assert!((task.reward - 15.0).abs() < f64::EPSILON);
}
