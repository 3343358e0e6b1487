//! Task claiming and completion.

use chrono::Utc;
use slack_morphism::prelude::SlackChannelId;
use tracing::warn;

use crate::dialog::DialogMode;
use crate::models::pending::PendingLink;
use crate::models::user_task::UserTaskStatus;
use crate::slack::blocks;
use crate::slack::handlers::{announce, say};
use crate::state::AppState;
use crate::Result;

/// Claim a task for the caller.
///
/// On success a tracking link is issued, the pending work-link queue
/// gets an entry, and the task group is notified. Exactly one of two
/// concurrent claimers succeeds; the loser is told the task is gone.
///
/// # Errors
///
/// Returns `AppError` if a store operation or the send fails.
pub async fn take(
    task_id: &str,
    user_id: &str,
    channel: &SlackChannelId,
    app: &AppState,
) -> Result<()> {
    app.users().get_or_create(user_id, user_id, user_id).await?;

    if !app.tasks().assign(task_id, user_id).await? {
        return say(app, channel, "Sorry, this task was just taken by someone else.").await;
    }

    let Some(task) = app.tasks().get(task_id).await? else {
        return say(app, channel, "That task no longer exists.").await;
    };

    let link_id = app.tracking().generate(user_id, task_id).await?;
    let tracking_url = app.config.tracking_url(&link_id);

    app.pending()
        .save(&PendingLink {
            task_id: task_id.to_owned(),
            user_id: user_id.to_owned(),
            username: user_id.to_owned(),
            task_title: task.title.clone(),
            message_sent: Utc::now(),
            tracking_link: tracking_url.clone(),
        })
        .await?;

    // Group notification is best effort; the pending entry above is the
    // durable record admins act on.
    if let Err(err) = announce(
        app,
        &app.config.slack.task_group_id,
        blocks::assignment_announcement(&task, user_id, &tracking_url),
    )
    .await
    {
        warn!(%err, task_id, "task group notification failed");
    }

    say(
        app,
        channel,
        format!(
            "You took *{}*. Your tracking link: {tracking_url}\n\
             An admin will send you the work link shortly.",
            task.title
        ),
    )
    .await
}

/// Start proof collection for one of the caller's in-progress tasks.
///
/// # Errors
///
/// Returns `AppError` if a store operation or the send fails.
pub async fn start_completion(
    task_id: &str,
    user_id: &str,
    channel: &SlackChannelId,
    app: &AppState,
) -> Result<()> {
    let link = app.tasks().get_user_task(user_id, task_id).await?;
    let in_progress = link.is_some_and(|l| l.status == UserTaskStatus::Active);
    if !in_progress {
        return say(app, channel, "This task is not in progress for you.").await;
    }

    app.dialogs
        .set(
            user_id,
            DialogMode::AwaitingProof {
                task_id: task_id.to_owned(),
            },
        )
        .await;
    say(
        app,
        channel,
        "Send the proof of completion (a link or a short description).",
    )
    .await
}

/// Consume the proof text, complete the task, and credit the payout.
///
/// # Errors
///
/// Returns `AppError` if a store operation or the send fails.
pub async fn handle_proof_text(
    task_id: &str,
    proof: &str,
    user_id: &str,
    channel: &SlackChannelId,
    app: &AppState,
) -> Result<()> {
    app.dialogs.clear(user_id).await;

    if !app.tasks().complete(task_id, user_id, proof).await? {
        return say(
            app,
            channel,
            "This task could not be completed. It may already be done or assigned to someone else.",
        )
        .await;
    }

    if let Some(task) = app.tasks().get(task_id).await? {
        if let Err(err) = announce(
            app,
            &app.config.slack.report_group_id,
            blocks::completion_announcement(&task, user_id),
        )
        .await
        {
            warn!(%err, task_id, "completion notification failed");
        }
        return say(
            app,
            channel,
            format!(
                "🎉 *{}* is complete. {:.2} was added to your balance.",
                task.title, task.reward
            ),
        )
        .await;
    }

    say(app, channel, "Task completed, payout credited.").await
}
