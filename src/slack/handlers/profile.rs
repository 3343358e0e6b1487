//! Profile screen.

use slack_morphism::prelude::SlackChannelId;

use crate::slack::blocks;
use crate::slack::handlers::say_blocks;
use crate::state::AppState;
use crate::Result;

/// Show the caller's profile with earnings and rating.
///
/// # Errors
///
/// Returns `AppError` if a store query or the send fails.
pub async fn show(user_id: &str, channel: &SlackChannelId, app: &AppState) -> Result<()> {
    app.users().get_or_create(user_id, user_id, user_id).await?;
    let user = app.users().get(user_id).await?;
    let stats = app.users().stats(user_id).await?;
    say_blocks(app, channel, "Profile", blocks::profile(user.as_ref(), &stats)).await
}
