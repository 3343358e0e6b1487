//! Block-action and dialog-text handlers.

pub mod admin;
pub mod links;
pub mod menu;
pub mod profile;
pub mod task;
pub mod wizard;

use slack_morphism::prelude::{SlackBlock, SlackChannelId};

use crate::slack::client::SlackMessage;
use crate::state::AppState;
use crate::Result;

/// Enqueue a plain-text reply. A no-op when Slack is not running.
pub(crate) async fn say(
    app: &AppState,
    channel: &SlackChannelId,
    text: impl Into<String>,
) -> Result<()> {
    let Some(ref slack) = app.slack else {
        return Ok(());
    };
    slack
        .enqueue(SlackMessage::plain(channel.clone(), text))
        .await
}

/// Enqueue a Block Kit reply. A no-op when Slack is not running.
pub(crate) async fn say_blocks(
    app: &AppState,
    channel: &SlackChannelId,
    fallback: impl Into<String>,
    blocks: Vec<SlackBlock>,
) -> Result<()> {
    let Some(ref slack) = app.slack else {
        return Ok(());
    };
    slack
        .enqueue(SlackMessage::with_blocks(channel.clone(), fallback, blocks))
        .await
}

/// Enqueue an announcement to a group channel by raw channel id.
pub(crate) async fn announce(
    app: &AppState,
    channel_id: &str,
    text: impl Into<String>,
) -> Result<()> {
    let Some(ref slack) = app.slack else {
        return Ok(());
    };
    slack
        .enqueue(SlackMessage::plain(
            SlackChannelId(channel_id.to_owned()),
            text,
        ))
        .await
}
