//! Slack slash command router.
//!
//! `/start` registers the user and shows the main menu; with a start
//! token it also records a tracking-link click. `/admin` opens the admin
//! panel for privileged users.

use std::sync::Arc;

use slack_morphism::prelude::{
    SlackBlock, SlackClient, SlackClientEventsUserState, SlackClientHyperHttpsConnector,
    SlackCommandEvent, SlackCommandEventResponse, SlackMessageContent, SlackMessageResponseType,
};
use tracing::{info, warn};

use crate::slack::blocks;
use crate::state::{AppState, AppStateSlot};

/// Handle incoming slash commands routed via Socket Mode.
///
/// # Errors
///
/// Never fails; problems degrade to an apologetic ephemeral reply.
pub async fn handle_command(
    event: SlackCommandEvent,
    _client: Arc<SlackClient<SlackClientHyperHttpsConnector>>,
    state: SlackClientEventsUserState,
) -> slack_morphism::AnyStdResult<SlackCommandEventResponse> {
    let app = {
        let guard = state.read().await;
        guard
            .get_user_state::<Arc<AppStateSlot>>()
            .and_then(|slot| slot.get())
    };

    let command = event.command.to_string();
    let user_id = event.user_id.to_string();
    info!(command, user_id, "received slash command");

    let Some(app) = app else {
        warn!("app state not available; acknowledging command only");
        return Ok(ephemeral_text("The bot is still starting up. Try again in a moment."));
    };

    let response = match command.as_str() {
        "/start" => handle_start(&app, &user_id, event.text.as_deref()).await,
        "/admin" => handle_admin(&app, &user_id).await,
        _ => ephemeral_text("Unknown command. Try /start."),
    };

    Ok(response)
}

async fn handle_start(
    app: &Arc<AppState>,
    user_id: &str,
    text: Option<&str>,
) -> SlackCommandEventResponse {
    if let Err(err) = app.users().get_or_create(user_id, user_id, user_id).await {
        warn!(%err, user_id, "user registration failed");
        return ephemeral_text("Something went wrong. Please try again.");
    }

    // A start token is a tracking-link id from a deep link; record the
    // click and show the linked task instead of the menu.
    if let Some(token) = text.map(str::trim).filter(|t| !t.is_empty()) {
        match app.tracking().get(token).await {
            Ok(Some(link)) => {
                if let Err(err) = app.tracking().increment_clicks(token).await {
                    warn!(%err, token, "click increment failed");
                }
                match app.tasks().get(&link.task_id).await {
                    Ok(Some(task)) => {
                        return ephemeral_blocks(&task.title, blocks::task_card(&task));
                    }
                    Ok(None) => warn!(token, task_id = link.task_id, "tracked task is gone"),
                    Err(err) => warn!(%err, token, "tracked task lookup failed"),
                }
            }
            Ok(None) => warn!(token, "start token does not match a tracking link"),
            Err(err) => warn!(%err, token, "tracking link lookup failed"),
        }
    }

    let is_admin = app.admins().is_admin(user_id).await.unwrap_or(false);
    ephemeral_blocks("Welcome!", blocks::main_menu(is_admin))
}

async fn handle_admin(app: &Arc<AppState>, user_id: &str) -> SlackCommandEventResponse {
    match app.admins().is_admin(user_id).await {
        Ok(true) => {
            let is_main = app.admins().is_main_admin(user_id);
            ephemeral_blocks("Admin panel", blocks::admin_panel(is_main))
        }
        Ok(false) => {
            warn!(user_id, "non-admin requested the admin panel");
            ephemeral_text("This command is for admins only.")
        }
        Err(err) => {
            warn!(%err, user_id, "admin lookup failed");
            ephemeral_text("Something went wrong. Please try again.")
        }
    }
}

fn ephemeral_text(text: &str) -> SlackCommandEventResponse {
    SlackCommandEventResponse {
        content: SlackMessageContent {
            text: Some(text.to_owned()),
            blocks: None,
            attachments: None,
            upload: None,
            files: None,
            reactions: None,
            metadata: None,
        },
        response_type: Some(SlackMessageResponseType::Ephemeral),
    }
}

fn ephemeral_blocks(fallback: &str, blocks: Vec<SlackBlock>) -> SlackCommandEventResponse {
    SlackCommandEventResponse {
        content: SlackMessageContent {
            text: Some(fallback.to_owned()),
            blocks: Some(blocks),
            attachments: None,
            upload: None,
            files: None,
            reactions: None,
            metadata: None,
        },
        response_type: Some(SlackMessageResponseType::Ephemeral),
    }
}
