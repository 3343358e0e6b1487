//! Pending work-link queue handling.
//!
//! After a task is claimed, an admin owes the assignee a work link.
//! The queue lists what is owed; an admin either provides the link
//! (which is stored on the task and forwarded to the assignee) or
//! skips the entry.

use slack_morphism::prelude::SlackChannelId;
use tracing::warn;

use crate::dialog::DialogMode;
use crate::slack::blocks;
use crate::slack::handlers::{announce, say, say_blocks};
use crate::state::AppState;
use crate::Result;

/// Show the pending work-link queue. Admins only.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for non-admins, `AppError` if a
/// store query or the send fails.
pub async fn show_pending(user_id: &str, channel: &SlackChannelId, app: &AppState) -> Result<()> {
    app.admins().ensure_admin(user_id).await?;
    let entries = app.pending().list_all().await?;
    say_blocks(app, channel, "Pending links", blocks::pending_links(&entries)).await
}

/// Start collecting a work link for a pending task. Admins only.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for non-admins, `AppError` if a
/// store query or the send fails.
pub async fn start_provide(
    task_id: &str,
    user_id: &str,
    channel: &SlackChannelId,
    app: &AppState,
) -> Result<()> {
    app.admins().ensure_admin(user_id).await?;

    let Some(entry) = app.pending().get(task_id).await? else {
        return say(app, channel, "That entry is no longer pending.").await;
    };

    app.dialogs
        .set(
            user_id,
            DialogMode::AwaitingWorkLink {
                task_id: task_id.to_owned(),
            },
        )
        .await;
    say(
        app,
        channel,
        format!("Send the work link for *{}* (must start with http).", entry.task_title),
    )
    .await
}

/// Dismiss a pending entry without providing a link. Admins only.
///
/// The assignee is told no separate work link is coming.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for non-admins, `AppError` if a
/// store operation or the send fails.
pub async fn skip(
    task_id: &str,
    user_id: &str,
    channel: &SlackChannelId,
    app: &AppState,
) -> Result<()> {
    app.admins().ensure_admin(user_id).await?;

    let entry = app.pending().get(task_id).await?;
    if !app.pending().delete(task_id).await? {
        return say(app, channel, "That entry is no longer pending.").await;
    }

    if let Some(entry) = entry {
        if let Err(err) = announce(
            app,
            &entry.user_id,
            format!(
                "ℹ️ No separate work link is needed for *{}*. \
                 Follow the task description and submit proof when done.",
                entry.task_title
            ),
        )
        .await
        {
            warn!(%err, task_id, "assignee skip notification failed");
        }
    }
    say(app, channel, "Entry dismissed.").await
}

/// Consume the work-link text, store it, and forward it to the assignee.
///
/// A message that is not an http(s) URL re-prompts without consuming
/// the dialog.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for non-admins, `AppError` if a
/// store operation or the send fails.
pub async fn handle_work_link_text(
    task_id: &str,
    text: &str,
    user_id: &str,
    channel: &SlackChannelId,
    app: &AppState,
) -> Result<()> {
    app.admins().ensure_admin(user_id).await?;

    let link = text.trim();
    if !link.starts_with("http://") && !link.starts_with("https://") {
        return say(app, channel, "That doesn't look like a URL. Send a link starting with http.")
            .await;
    }
    app.dialogs.clear(user_id).await;

    if !app.tasks().set_work_link(task_id, link).await? {
        return say(app, channel, "That task no longer exists.").await;
    }

    let entry = app.pending().get(task_id).await?;
    app.pending().delete(task_id).await?;

    if let Some(entry) = entry {
        if let Err(err) = announce(
            app,
            &entry.user_id,
            format!("🔗 Work link for *{}*: {link}", entry.task_title),
        )
        .await
        {
            warn!(%err, task_id, "assignee link notification failed");
        }
    }
    say(app, channel, "Work link saved and sent to the assignee.").await
}
