//! Admin panel, statistics, and admin management.

use slack_morphism::prelude::SlackChannelId;

use crate::dialog::DialogMode;
use crate::slack::blocks;
use crate::slack::handlers::{say, say_blocks};
use crate::state::AppState;
use crate::Result;

/// Show the admin panel. Admins only.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for non-admins, `AppError` if the
/// send fails.
pub async fn show_panel(user_id: &str, channel: &SlackChannelId, app: &AppState) -> Result<()> {
    app.admins().ensure_admin(user_id).await?;
    let is_main = app.admins().is_main_admin(user_id);
    say_blocks(app, channel, "Admin panel", blocks::admin_panel(is_main)).await
}

/// Show marketplace-wide statistics. Admins only.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for non-admins, `AppError` if a
/// store query or the send fails.
pub async fn show_stats(user_id: &str, channel: &SlackChannelId, app: &AppState) -> Result<()> {
    app.admins().ensure_admin(user_id).await?;

    let users = app.users().count().await?;
    let (total, in_progress, completed, payout) = app.tasks().overview_counts().await?;
    let workers = app.tasks().count_distinct_workers().await?;
    let top = app.users().top_earners(5).await?;

    let mut text = format!(
        "*Marketplace statistics*\n\
         Users: {users}\nWorkers: {workers}\n\
         Tasks: {total} total, {in_progress} in progress, {completed} completed\n\
         Total payout: {payout:.2}",
    );
    if !top.is_empty() {
        text.push_str("\n\n*Top earners*");
        for user in &top {
            text.push_str(&format!("\n{} — {:.2}", user.first_name, user.earned));
        }
    }
    say(app, channel, text).await
}

/// List the most recent tasks across all users. Admins only.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for non-admins, `AppError` if a
/// store query or the send fails.
pub async fn show_all_tasks(user_id: &str, channel: &SlackChannelId, app: &AppState) -> Result<()> {
    app.admins().ensure_admin(user_id).await?;

    let tasks = app.tasks().list_recent(20).await?;
    if tasks.is_empty() {
        return say(app, channel, "No tasks have been created yet.").await;
    }

    let mut text = String::from("*Recent tasks*");
    for task in &tasks {
        let status = if task.completed {
            "completed"
        } else if task.taken_by.is_some() {
            "in progress"
        } else if task.is_claimable() {
            "available"
        } else {
            "inactive"
        };
        text.push_str(&format!(
            "\n`{}` {} · {:.2} · {status}",
            task.task_id, task.title, task.reward
        ));
    }
    say(app, channel, text).await
}

/// Show the admin management screen. Main admin only.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for everyone else, `AppError` if a
/// store query or the send fails.
pub async fn show_manage(user_id: &str, channel: &SlackChannelId, app: &AppState) -> Result<()> {
    app.admins().ensure_main_admin(user_id)?;
    let admins = app.admins().list_admins().await?;
    say_blocks(app, channel, "Admins", blocks::manage_admins(&admins)).await
}

/// Start collecting the id of a new admin. Main admin only.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for everyone else, `AppError` if
/// the send fails.
pub async fn start_add(user_id: &str, channel: &SlackChannelId, app: &AppState) -> Result<()> {
    app.admins().ensure_main_admin(user_id)?;
    app.dialogs.set(user_id, DialogMode::AwaitingAdminId).await;
    say(
        app,
        channel,
        "Send the user to promote (a mention like <@U123ABC> or a raw user id).",
    )
    .await
}

/// Consume the text naming the user to promote. Main admin only.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for everyone else, `AppError` if a
/// store operation or the send fails.
pub async fn handle_admin_id_text(
    text: &str,
    user_id: &str,
    channel: &SlackChannelId,
    app: &AppState,
) -> Result<()> {
    app.admins().ensure_main_admin(user_id)?;
    app.dialogs.clear(user_id).await;

    let target = parse_user_ref(text);
    if target.is_empty() {
        return say(app, channel, "That doesn't look like a user id. Try again from the admin panel.")
            .await;
    }

    app.admins().add_admin(&target, &target, user_id).await?;
    say(app, channel, format!("✅ <@{target}> is now an admin.")).await
}

/// Revoke an admin. Main admin only; the main admin itself is never
/// removable.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for everyone else, `AppError` if a
/// store operation or the send fails.
pub async fn remove(
    target: &str,
    user_id: &str,
    channel: &SlackChannelId,
    app: &AppState,
) -> Result<()> {
    app.admins().ensure_main_admin(user_id)?;

    if app.admins().remove_admin(target).await? {
        say(app, channel, format!("<@{target}> is no longer an admin.")).await
    } else {
        say(app, channel, "That admin could not be removed.").await
    }
}

/// Extract a user id from `<@U123>`, `<@U123|name>`, or a raw id.
fn parse_user_ref(text: &str) -> String {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix("<@")
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(trimmed);
    let id = inner.split('|').next().unwrap_or_default().trim();
    if id.chars().all(|c| c.is_ascii_alphanumeric()) {
        id.to_owned()
    } else {
        String::new()
    }
}
