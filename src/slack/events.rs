//! Slack event dispatch.
//!
//! Interactive payloads and message pushes arrive here via Socket Mode.
//! Button payloads are parsed at this boundary into the closed [`Action`]
//! enum; anything that does not parse is logged and dropped, so handlers
//! only ever see well-formed actions. Privilege checks live in the
//! handlers themselves and run on every invocation.

use std::sync::Arc;

use slack_morphism::prelude::{
    SlackChannelId, SlackClient, SlackClientEventsUserState, SlackClientHyperHttpsConnector,
    SlackEventCallbackBody, SlackInteractionEvent, SlackPushEventCallback,
};
use tracing::{info, warn};

use crate::dialog::DialogMode;
use crate::models::task::TaskKind;
use crate::slack::handlers;
use crate::state::{AppState, AppStateSlot};
use crate::{AppError, Result};

/// Stable `action_id` strings shared by block builders and the parser.
pub mod action_ids {
    /// Back to the main menu.
    pub const MENU_MAIN: &str = "menu_main";
    /// List claimable tasks.
    pub const MENU_AVAILABLE: &str = "menu_available";
    /// List the caller's in-progress tasks.
    pub const MENU_ACTIVE: &str = "menu_active";
    /// List the caller's completed tasks.
    pub const MENU_COMPLETED: &str = "menu_completed";
    /// Show the profile screen.
    pub const MENU_PROFILE: &str = "menu_profile";
    /// Show the help text.
    pub const MENU_HELP: &str = "menu_help";
    /// Show a task card. Value is the task id.
    pub const TASK_VIEW: &str = "task_view";
    /// Claim a task. Value is the task id.
    pub const TASK_TAKE: &str = "task_take";
    /// Start proof submission. Value is the task id.
    pub const TASK_COMPLETE: &str = "task_complete";
    /// Show the admin panel.
    pub const ADMIN_PANEL: &str = "admin_panel";
    /// Start the task-creation wizard.
    pub const ADMIN_CREATE_TASK: &str = "admin_create_task";
    /// Wizard kind selection. Value is a kind token.
    pub const WIZARD_KIND: &str = "wizard_kind";
    /// Show the pending work-link queue.
    pub const ADMIN_PENDING: &str = "admin_pending";
    /// Start providing a work link. Value is the task id.
    pub const LINK_PROVIDE: &str = "link_provide";
    /// Dismiss a pending link entry. Value is the task id.
    pub const LINK_SKIP: &str = "link_skip";
    /// Show the statistics screen.
    pub const ADMIN_STATS: &str = "admin_stats";
    /// List recent tasks across all users.
    pub const ADMIN_TASKS: &str = "admin_tasks";
    /// Show the admin management screen.
    pub const ADMIN_MANAGE: &str = "admin_manage";
    /// Start adding an admin.
    pub const ADMIN_ADD: &str = "admin_add";
    /// Revoke an admin. Value is the user id.
    pub const ADMIN_REMOVE: &str = "admin_remove";
}

/// Every button press the bot understands.
///
/// The variants carry exactly the payload the handler needs; there is no
/// catch-all, so an unrecognized or malformed payload never reaches a
/// handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Back to the main menu.
    MainMenu,
    /// List claimable tasks.
    ListAvailable,
    /// List the caller's in-progress tasks.
    ListActive,
    /// List the caller's completed tasks.
    ListCompleted,
    /// Show the profile screen.
    Profile,
    /// Show the help text.
    Help,
    /// Show a task card.
    ViewTask(String),
    /// Claim a task.
    TakeTask(String),
    /// Start proof submission for a task.
    CompleteTask(String),
    /// Show the admin panel.
    AdminPanel,
    /// Start the task-creation wizard.
    CreateTask,
    /// Wizard kind selection.
    SelectKind(TaskKind),
    /// Show the pending work-link queue.
    PendingLinks,
    /// Start providing a work link for a task.
    ProvideLink(String),
    /// Dismiss a pending link entry.
    SkipLink(String),
    /// Show the statistics screen.
    AdminStats,
    /// List recent tasks across all users.
    AllTasks,
    /// Show the admin management screen.
    ManageAdmins,
    /// Start adding an admin.
    AddAdmin,
    /// Revoke an admin.
    RemoveAdmin(String),
}

impl Action {
    /// Parse an `action_id` and button value into an action.
    ///
    /// Returns `None` for unknown ids, missing payloads, or payloads
    /// that fail to parse. Callers drop those.
    #[must_use]
    pub fn parse(action_id: &str, value: Option<&str>) -> Option<Self> {
        let payload = || value.filter(|v| !v.is_empty()).map(str::to_owned);
        match action_id {
            action_ids::MENU_MAIN => Some(Self::MainMenu),
            action_ids::MENU_AVAILABLE => Some(Self::ListAvailable),
            action_ids::MENU_ACTIVE => Some(Self::ListActive),
            action_ids::MENU_COMPLETED => Some(Self::ListCompleted),
            action_ids::MENU_PROFILE => Some(Self::Profile),
            action_ids::MENU_HELP => Some(Self::Help),
            action_ids::TASK_VIEW => payload().map(Self::ViewTask),
            action_ids::TASK_TAKE => payload().map(Self::TakeTask),
            action_ids::TASK_COMPLETE => payload().map(Self::CompleteTask),
            action_ids::ADMIN_PANEL => Some(Self::AdminPanel),
            action_ids::ADMIN_CREATE_TASK => Some(Self::CreateTask),
            action_ids::WIZARD_KIND => value.and_then(TaskKind::parse).map(Self::SelectKind),
            action_ids::ADMIN_PENDING => Some(Self::PendingLinks),
            action_ids::LINK_PROVIDE => payload().map(Self::ProvideLink),
            action_ids::LINK_SKIP => payload().map(Self::SkipLink),
            action_ids::ADMIN_STATS => Some(Self::AdminStats),
            action_ids::ADMIN_TASKS => Some(Self::AllTasks),
            action_ids::ADMIN_MANAGE => Some(Self::ManageAdmins),
            action_ids::ADMIN_ADD => Some(Self::AddAdmin),
            action_ids::ADMIN_REMOVE => payload().map(Self::RemoveAdmin),
            _ => None,
        }
    }
}

async fn app_from(state: &SlackClientEventsUserState) -> Option<Arc<AppState>> {
    let guard = state.read().await;
    guard
        .get_user_state::<Arc<AppStateSlot>>()
        .and_then(|slot| slot.get())
}

/// Handle interactive payloads (button presses) delivered via Socket Mode.
///
/// # Errors
///
/// Never fails; handler errors are logged and swallowed so the socket
/// loop keeps running.
pub async fn handle_interaction(
    event: SlackInteractionEvent,
    _client: Arc<SlackClient<SlackClientHyperHttpsConnector>>,
    state: SlackClientEventsUserState,
) -> slack_morphism::UserCallbackResult<()> {
    let SlackInteractionEvent::BlockActions(block_event) = &event else {
        info!(?event, "unhandled interaction event type");
        return Ok(());
    };

    let Some(app) = app_from(&state).await else {
        warn!("app state not available; dropping interaction");
        return Ok(());
    };

    let user_id = block_event
        .user
        .as_ref()
        .map(|u| u.id.to_string())
        .unwrap_or_default();
    if user_id.is_empty() {
        warn!("block action with empty user id; ignoring");
        return Ok(());
    }

    let Some(channel) = block_event.channel.as_ref().map(|c| c.id.clone()) else {
        warn!(user_id, "block action without a channel; ignoring");
        return Ok(());
    };

    for raw in block_event.actions.as_deref().unwrap_or_default() {
        let action_id = raw.action_id.to_string();
        let Some(action) = Action::parse(&action_id, raw.value.as_deref()) else {
            warn!(action_id, user_id, "unknown or malformed action payload; dropped");
            continue;
        };
        info!(action_id, user_id, "dispatching block action");
        match dispatch_action(action, &user_id, &channel, &app).await {
            Ok(()) => {}
            Err(AppError::Unauthorized(reason)) => {
                warn!(user_id, action_id, reason, "unauthorized action ignored");
            }
            Err(err) => warn!(%err, action_id, "action handler failed"),
        }
    }

    Ok(())
}

async fn dispatch_action(
    action: Action,
    user_id: &str,
    channel: &SlackChannelId,
    app: &Arc<AppState>,
) -> Result<()> {
    match action {
        Action::MainMenu => handlers::menu::show_main(user_id, channel, app).await,
        Action::ListAvailable => handlers::menu::show_available(channel, app).await,
        Action::ListActive => handlers::menu::show_active(user_id, channel, app).await,
        Action::ListCompleted => handlers::menu::show_completed(user_id, channel, app).await,
        Action::Profile => handlers::profile::show(user_id, channel, app).await,
        Action::Help => handlers::menu::show_help(channel, app).await,
        Action::ViewTask(task_id) => handlers::menu::view_task(&task_id, channel, app).await,
        Action::TakeTask(task_id) => {
            handlers::task::take(&task_id, user_id, channel, app).await
        }
        Action::CompleteTask(task_id) => {
            handlers::task::start_completion(&task_id, user_id, channel, app).await
        }
        Action::AdminPanel => handlers::admin::show_panel(user_id, channel, app).await,
        Action::CreateTask => handlers::wizard::start(user_id, channel, app).await,
        Action::SelectKind(kind) => {
            handlers::wizard::handle_kind(kind, user_id, channel, app).await
        }
        Action::PendingLinks => handlers::links::show_pending(user_id, channel, app).await,
        Action::ProvideLink(task_id) => {
            handlers::links::start_provide(&task_id, user_id, channel, app).await
        }
        Action::SkipLink(task_id) => {
            handlers::links::skip(&task_id, user_id, channel, app).await
        }
        Action::AdminStats => handlers::admin::show_stats(user_id, channel, app).await,
        Action::AllTasks => handlers::admin::show_all_tasks(user_id, channel, app).await,
        Action::ManageAdmins => handlers::admin::show_manage(user_id, channel, app).await,
        Action::AddAdmin => handlers::admin::start_add(user_id, channel, app).await,
        Action::RemoveAdmin(target) => {
            handlers::admin::remove(&target, user_id, channel, app).await
        }
    }
}

/// Handle push events (direct messages) delivered via Socket Mode.
///
/// Free text only matters while the sender has an active dialog mode;
/// everything else is ignored.
///
/// # Errors
///
/// Never fails; handler errors are logged and swallowed.
pub async fn handle_push(
    event: SlackPushEventCallback,
    _client: Arc<SlackClient<SlackClientHyperHttpsConnector>>,
    state: SlackClientEventsUserState,
) -> slack_morphism::UserCallbackResult<()> {
    let SlackEventCallbackBody::Message(message) = &event.event else {
        return Ok(());
    };
    // Only human DMs drive dialogs.
    if message.sender.bot_id.is_some() {
        return Ok(());
    }
    let Some(user_id) = message.sender.user.as_ref().map(ToString::to_string) else {
        return Ok(());
    };
    let Some(channel) = message.origin.channel.clone() else {
        return Ok(());
    };
    let Some(text) = message
        .content
        .as_ref()
        .and_then(|content| content.text.clone())
        .filter(|text| !text.trim().is_empty())
    else {
        return Ok(());
    };

    let Some(app) = app_from(&state).await else {
        warn!("app state not available; dropping message");
        return Ok(());
    };

    let Some(mode) = app.dialogs.get(&user_id).await else {
        return Ok(());
    };

    let result = match mode {
        DialogMode::CreatingTask { step, draft } => {
            handlers::wizard::handle_text(step, draft, &text, &user_id, &channel, &app).await
        }
        DialogMode::AwaitingAdminId => {
            handlers::admin::handle_admin_id_text(&text, &user_id, &channel, &app).await
        }
        DialogMode::AwaitingProof { task_id } => {
            handlers::task::handle_proof_text(&task_id, &text, &user_id, &channel, &app).await
        }
        DialogMode::AwaitingWorkLink { task_id } => {
            handlers::links::handle_work_link_text(&task_id, &text, &user_id, &channel, &app).await
        }
    };

    if let Err(err) = result {
        warn!(%err, user_id, "dialog text handler failed");
    }

    Ok(())
}
