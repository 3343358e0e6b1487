//! Main menu and task browsing.

use slack_morphism::prelude::SlackChannelId;

use crate::slack::blocks;
use crate::slack::handlers::{say, say_blocks};
use crate::state::AppState;
use crate::Result;

/// Show the main menu, registering the user on first contact.
///
/// # Errors
///
/// Returns `AppError` if a store query or the send fails.
pub async fn show_main(user_id: &str, channel: &SlackChannelId, app: &AppState) -> Result<()> {
    app.users().get_or_create(user_id, user_id, user_id).await?;
    let is_admin = app.admins().is_admin(user_id).await?;
    say_blocks(app, channel, "Menu", blocks::main_menu(is_admin)).await
}

/// Show the claimable task list.
///
/// # Errors
///
/// Returns `AppError` if a store query or the send fails.
pub async fn show_available(channel: &SlackChannelId, app: &AppState) -> Result<()> {
    let tasks = app.tasks().list_available().await?;
    say_blocks(app, channel, "Available tasks", blocks::available_tasks(&tasks)).await
}

/// Show the caller's in-progress tasks.
///
/// # Errors
///
/// Returns `AppError` if a store query or the send fails.
pub async fn show_active(user_id: &str, channel: &SlackChannelId, app: &AppState) -> Result<()> {
    let tasks = app.tasks().list_active_for_user(user_id).await?;
    say_blocks(app, channel, "Your tasks", blocks::active_tasks(&tasks)).await
}

/// Show the caller's completed tasks.
///
/// # Errors
///
/// Returns `AppError` if a store query or the send fails.
pub async fn show_completed(user_id: &str, channel: &SlackChannelId, app: &AppState) -> Result<()> {
    let tasks = app.tasks().list_completed_for_user(user_id).await?;
    say_blocks(app, channel, "Completed tasks", blocks::completed_tasks(&tasks)).await
}

/// Show the help text.
///
/// # Errors
///
/// Returns `AppError` if the send fails.
pub async fn show_help(channel: &SlackChannelId, app: &AppState) -> Result<()> {
    say(
        app,
        channel,
        "Browse *Available tasks* and take one to get a tracking link. \
         When you are done, open *My tasks* and submit proof; the reward \
         lands on your balance once it is accepted. Your *Profile* shows \
         earnings and rating. Send `/start` any time to get back to the menu.",
    )
    .await
}

/// Show a single task card.
///
/// # Errors
///
/// Returns `AppError` if a store query or the send fails.
pub async fn view_task(task_id: &str, channel: &SlackChannelId, app: &AppState) -> Result<()> {
    match app.tasks().get(task_id).await? {
        Some(task) => say_blocks(app, channel, "Task", blocks::task_card(&task)).await,
        None => say(app, channel, "That task no longer exists.").await,
    }
}
