//! Slack Block Kit message builders.
//!
//! All interactive surfaces of the bot are built here: the main menu,
//! task cards and lists, the profile screen, the admin panel, and the
//! pending work-link queue. Handlers stay free of layout code.

use slack_morphism::prelude::{
    SlackActionBlockElement, SlackActionsBlock, SlackBlock, SlackBlockButtonElement, SlackBlockId,
    SlackBlockPlainTextOnly, SlackBlockText, SlackSectionBlock,
};

use crate::models::pending::PendingLink;
use crate::models::task::{Task, TaskKind};
use crate::models::user::{User, UserStats};
use crate::slack::events::action_ids;

/// Build a plain Markdown section block.
#[must_use]
pub fn text_section(text: &str) -> SlackBlock {
    SlackBlock::Section(SlackSectionBlock::new().with_text(SlackBlockText::MarkDown(text.into())))
}

/// Build an actions block with the given buttons.
#[must_use]
pub fn action_buttons(block_id: &str, buttons: &[(&str, &str, &str)]) -> SlackBlock {
    let elements: Vec<SlackActionBlockElement> = buttons
        .iter()
        .map(|(action_id, text, value)| {
            SlackActionBlockElement::Button(
                SlackBlockButtonElement::new(
                    (*action_id).into(),
                    SlackBlockPlainTextOnly::from(*text),
                )
                .with_value((*value).into()),
            )
        })
        .collect();
    SlackBlock::Actions(
        SlackActionsBlock::new(elements).with_block_id(SlackBlockId(block_id.into())),
    )
}

/// Main menu shown on `/start` and after most flows finish.
#[must_use]
pub fn main_menu(is_admin: bool) -> Vec<SlackBlock> {
    let mut blocks = vec![
        text_section("*What would you like to do?*"),
        action_buttons(
            "menu_tasks",
            &[
                (action_ids::MENU_AVAILABLE, "📋 Available tasks", "-"),
                (action_ids::MENU_ACTIVE, "🔄 My tasks", "-"),
                (action_ids::MENU_COMPLETED, "✅ Completed", "-"),
                (action_ids::MENU_PROFILE, "👤 Profile", "-"),
                (action_ids::MENU_HELP, "❓ Help", "-"),
            ],
        ),
    ];
    if is_admin {
        blocks.push(action_buttons(
            "menu_admin",
            &[(action_ids::ADMIN_PANEL, "⚙️ Admin panel", "-")],
        ));
    }
    blocks
}

fn task_summary_line(task: &Task) -> String {
    format!(
        "*{}* · {} · reward {:.2}",
        task.title,
        task.kind.label(),
        task.reward
    )
}

/// List of claimable tasks, one View button per task.
#[must_use]
pub fn available_tasks(tasks: &[Task]) -> Vec<SlackBlock> {
    if tasks.is_empty() {
        return vec![text_section("No tasks are available right now. Check back later.")];
    }
    let mut blocks = vec![text_section("*Available tasks*")];
    for task in tasks {
        blocks.push(text_section(&task_summary_line(task)));
        blocks.push(action_buttons(
            &format!("task_{}", task.task_id),
            &[(action_ids::TASK_VIEW, "View", task.task_id.as_str())],
        ));
    }
    blocks
}

/// Full task card with a Take button when the task is claimable.
#[must_use]
pub fn task_card(task: &Task) -> Vec<SlackBlock> {
    let body = format!(
        "*{}*\n{}\n\n*Type:* {}\n*Target:* {}\n*Reward:* {:.2}\n*Requirements:* {}",
        task.title, task.description, task.kind.label(), task.target, task.reward,
        task.requirements,
    );
    let mut blocks = vec![text_section(&body)];
    if task.is_claimable() {
        blocks.push(action_buttons(
            &format!("take_{}", task.task_id),
            &[(action_ids::TASK_TAKE, "Take this task", task.task_id.as_str())],
        ));
    }
    blocks.push(back_to_menu());
    blocks
}

/// The user's in-progress tasks, one Complete button per task.
#[must_use]
pub fn active_tasks(tasks: &[Task]) -> Vec<SlackBlock> {
    if tasks.is_empty() {
        return vec![text_section("You have no tasks in progress.")];
    }
    let mut blocks = vec![text_section("*Your tasks in progress*")];
    for task in tasks {
        let line = match &task.work_link {
            Some(link) => format!("{}\nWork link: {link}", task_summary_line(task)),
            None => format!(
                "{}\nWork link pending. An admin will send it shortly.",
                task_summary_line(task)
            ),
        };
        blocks.push(text_section(&line));
        blocks.push(action_buttons(
            &format!("complete_{}", task.task_id),
            &[(action_ids::TASK_COMPLETE, "Submit proof", task.task_id.as_str())],
        ));
    }
    blocks
}

/// The user's completed tasks.
#[must_use]
pub fn completed_tasks(tasks: &[Task]) -> Vec<SlackBlock> {
    if tasks.is_empty() {
        return vec![text_section("You have not completed any tasks yet.")];
    }
    let mut blocks = vec![text_section("*Your completed tasks*")];
    for task in tasks {
        blocks.push(text_section(&format!(
            "✅ {} · earned {:.2}",
            task.title, task.reward
        )));
    }
    blocks
}

/// Profile screen with earnings and the derived rating.
#[must_use]
pub fn profile(user: Option<&User>, stats: &UserStats) -> Vec<SlackBlock> {
    let name = user.map_or("unknown", |u| u.first_name.as_str());
    let body = format!(
        "*{name}*\n\nCompleted tasks: {}\nIn progress: {}\nTotal earned: {:.2}\nRating: ⭐ {}",
        stats.completed_count, stats.active_count, stats.total_earned, stats.rating,
    );
    vec![text_section(&body), back_to_menu()]
}

/// Task-kind picker for the creation wizard.
#[must_use]
pub fn kind_picker() -> Vec<SlackBlock> {
    let kinds = [
        TaskKind::Subscribers,
        TaskKind::AdPost,
        TaskKind::Clicks,
        TaskKind::AppInstall,
        TaskKind::Other,
    ];
    let buttons: Vec<(&str, &str, &str)> = kinds
        .iter()
        .map(|kind| (action_ids::WIZARD_KIND, kind.label(), kind.as_str()))
        .collect();
    vec![
        text_section("*Step 3 of 6.* Choose the task type:"),
        action_buttons("wizard_kind", &buttons),
    ]
}

/// Admin panel entry screen.
#[must_use]
pub fn admin_panel(is_main_admin: bool) -> Vec<SlackBlock> {
    let mut blocks = vec![
        text_section("*Admin panel*"),
        action_buttons(
            "admin_actions",
            &[
                (action_ids::ADMIN_CREATE_TASK, "➕ Create task", "-"),
                (action_ids::ADMIN_TASKS, "📋 All tasks", "-"),
                (action_ids::ADMIN_PENDING, "🔗 Pending links", "-"),
                (action_ids::ADMIN_STATS, "📊 Statistics", "-"),
            ],
        ),
    ];
    if is_main_admin {
        blocks.push(action_buttons(
            "admin_manage",
            &[(action_ids::ADMIN_MANAGE, "👥 Manage admins", "-")],
        ));
    }
    blocks.push(back_to_menu());
    blocks
}

/// Pending work-link queue, Provide/Skip buttons per entry.
#[must_use]
pub fn pending_links(entries: &[PendingLink]) -> Vec<SlackBlock> {
    if entries.is_empty() {
        return vec![text_section("No tasks are waiting for a work link. 🎉")];
    }
    let mut blocks = vec![text_section("*Tasks waiting for a work link*")];
    for entry in entries {
        blocks.push(text_section(&format!(
            "*{}* · taken by {} (<@{}>)",
            entry.task_title, entry.username, entry.user_id
        )));
        blocks.push(action_buttons(
            &format!("pending_{}", entry.task_id),
            &[
                (action_ids::LINK_PROVIDE, "Send link", entry.task_id.as_str()),
                (action_ids::LINK_SKIP, "Skip", entry.task_id.as_str()),
            ],
        ));
    }
    blocks
}

/// Admin list with Remove buttons, main-admin only.
#[must_use]
pub fn manage_admins(admins: &[crate::models::admin::Admin]) -> Vec<SlackBlock> {
    let mut blocks = vec![
        text_section("*Admins*"),
        action_buttons(
            "admin_add",
            &[(action_ids::ADMIN_ADD, "➕ Add admin", "-")],
        ),
    ];
    for admin in admins {
        blocks.push(text_section(&format!(
            "{} (<@{}>)",
            admin.username, admin.user_id
        )));
        blocks.push(action_buttons(
            &format!("rmadmin_{}", admin.user_id),
            &[(action_ids::ADMIN_REMOVE, "Remove", admin.user_id.as_str())],
        ));
    }
    blocks
}

fn back_to_menu() -> SlackBlock {
    action_buttons(
        "nav_back",
        &[(action_ids::MENU_MAIN, "⬅️ Menu", "-")],
    )
}

/// Group announcement posted when a task is claimed.
#[must_use]
pub fn assignment_announcement(task: &Task, username: &str, tracking_url: &str) -> String {
    format!(
        "📌 *{}* was taken by {}.\nReward: {:.2}\nTracking link: {tracking_url}",
        task.title, username, task.reward
    )
}

/// Group announcement posted when a task is completed.
#[must_use]
pub fn completion_announcement(task: &Task, username: &str) -> String {
    format!(
        "🏁 *{}* was completed by {}. Payout: {:.2}",
        task.title, username, task.reward
    )
}
