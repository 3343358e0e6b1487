//! Background tasks: the daily activity report and dialog expiry.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Duration as ChronoDuration, TimeZone, Utc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::slack::handlers::announce;
use crate::state::AppState;
use crate::Result;

const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Spawn the daily report task.
///
/// Sleeps until the configured report hour (UTC), posts a summary of
/// the last 24 hours to the report group, and repeats.
#[must_use]
pub fn spawn_report_task(state: Arc<AppState>, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let wait = until_next_run(state.config.report_hour);
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("report task shutting down");
                    break;
                }
                () = tokio::time::sleep(wait) => {
                    if let Err(err) = post_daily_report(&state).await {
                        error!(?err, "daily report failed");
                    }
                }
            }
        }
    })
}

/// Spawn the dialog expiry sweep.
///
/// Expired conversation state is also dropped lazily on access; this
/// sweep bounds the memory held by abandoned dialogs.
#[must_use]
pub fn spawn_dialog_prune_task(
    state: Arc<AppState>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PRUNE_INTERVAL);
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("dialog prune task shutting down");
                    break;
                }
                _ = interval.tick() => {
                    let removed = state.dialogs.prune().await;
                    if removed > 0 {
                        info!(removed, "expired dialogs pruned");
                    }
                }
            }
        }
    })
}

fn until_next_run(report_hour: u32) -> Duration {
    let now = Utc::now();
    let today_run = Utc
        .with_ymd_and_hms(now.year(), now.month(), now.day(), report_hour, 0, 0)
        .single()
        .unwrap_or(now);
    let next = if today_run > now {
        today_run
    } else {
        today_run + ChronoDuration::days(1)
    };
    (next - now).to_std().unwrap_or(Duration::from_secs(60))
}

async fn post_daily_report(state: &AppState) -> Result<()> {
    let end = Utc::now();
    let start = end - ChronoDuration::hours(24);

    let completed = state.tasks().completed_between(start, end).await?;
    let payout: f64 = completed.iter().map(|task| task.reward).sum();
    let top = state.tasks().top_performer_between(start, end).await?;
    let users = state.users().count().await?;

    let mut text = format!(
        "📊 *Daily report*\n\
         Tasks completed: {}\nPayout: {payout:.2}\nRegistered users: {users}",
        completed.len(),
    );
    if let Some((user_id, earned)) = top {
        text.push_str(&format!("\nTop performer: <@{user_id}> ({earned:.2})"));
    }

    announce(state, &state.config.slack.report_group_id, text).await?;
    info!(completed = completed.len(), "daily report posted");
    Ok(())
}
