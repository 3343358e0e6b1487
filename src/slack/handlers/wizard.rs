//! Task-creation wizard.
//!
//! Admins walk through six prompts (title, description, kind, target,
//! reward, requirements). Progress lives in the dialog store; the task
//! row is only written once the final step is accepted.

use slack_morphism::prelude::SlackChannelId;

use crate::dialog::{self, DialogMode, TaskDraft, WizardInput, WizardOutcome, WizardStep};
use crate::models::task::TaskKind;
use crate::slack::blocks;
use crate::slack::handlers::{say, say_blocks};
use crate::state::AppState;
use crate::Result;

fn prompt_for(step: WizardStep) -> String {
    let text = match step {
        WizardStep::Title => "Enter the task title:",
        WizardStep::Description => "Enter the task description:",
        WizardStep::Kind => "Choose the task type:",
        WizardStep::Target => "Enter the target (e.g. \"1000 subscribers\"):",
        WizardStep::Reward => "Enter the reward amount (a positive number):",
        WizardStep::Requirements => "Enter any additional requirements (or \"-\" for none):",
    };
    format!("*Step {} of 6.* {text}", step.position())
}

/// Start the wizard. Admins only.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for non-admins, `AppError` if the
/// send fails.
pub async fn start(user_id: &str, channel: &SlackChannelId, app: &AppState) -> Result<()> {
    app.admins().ensure_admin(user_id).await?;
    app.dialogs
        .set(
            user_id,
            DialogMode::CreatingTask {
                step: WizardStep::Title,
                draft: TaskDraft::default(),
            },
        )
        .await;
    say(app, channel, prompt_for(WizardStep::Title)).await
}

/// Feed one free-text message into the wizard.
///
/// "cancel" aborts the wizard at any step.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` if the caller lost admin rights
/// mid-wizard, `AppError` if a store operation or the send fails.
pub async fn handle_text(
    step: WizardStep,
    mut draft: TaskDraft,
    text: &str,
    user_id: &str,
    channel: &SlackChannelId,
    app: &AppState,
) -> Result<()> {
    app.admins().ensure_admin(user_id).await?;

    if text.trim().eq_ignore_ascii_case("cancel") {
        app.dialogs.clear(user_id).await;
        return say(app, channel, "Task creation cancelled.").await;
    }

    let outcome = dialog::advance_wizard(step, &mut draft, WizardInput::Text(text));
    apply_outcome(outcome, draft, user_id, channel, app).await
}

/// Feed a kind-button selection into the wizard.
///
/// Ignored unless the caller is currently on the kind step.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for non-admins, `AppError` if a
/// store operation or the send fails.
pub async fn handle_kind(
    kind: TaskKind,
    user_id: &str,
    channel: &SlackChannelId,
    app: &AppState,
) -> Result<()> {
    app.admins().ensure_admin(user_id).await?;

    let Some(DialogMode::CreatingTask { step, mut draft }) = app.dialogs.get(user_id).await else {
        return say(app, channel, "No task is being created right now.").await;
    };

    let outcome = dialog::advance_wizard(step, &mut draft, WizardInput::Kind(kind));
    apply_outcome(outcome, draft, user_id, channel, app).await
}

async fn apply_outcome(
    outcome: WizardOutcome,
    draft: TaskDraft,
    user_id: &str,
    channel: &SlackChannelId,
    app: &AppState,
) -> Result<()> {
    match outcome {
        WizardOutcome::Advanced(next) => {
            app.dialogs
                .set(user_id, DialogMode::CreatingTask { step: next, draft })
                .await;
            if next == WizardStep::Kind {
                say_blocks(app, channel, "Choose the task type", blocks::kind_picker()).await
            } else {
                say(app, channel, prompt_for(next)).await
            }
        }
        WizardOutcome::Reprompt(step) => {
            app.dialogs
                .set(user_id, DialogMode::CreatingTask { step, draft })
                .await;
            say(
                app,
                channel,
                format!("That doesn't look right. {}", prompt_for(step)),
            )
            .await
        }
        WizardOutcome::Finished(new_task) => {
            app.dialogs.clear(user_id).await;
            let title = new_task.title.clone();
            let task_id = app.tasks().create(new_task, user_id).await?;
            say(
                app,
                channel,
                format!("✅ Task *{title}* created with id `{task_id}`. It is now available to users."),
            )
            .await
        }
    }
}
