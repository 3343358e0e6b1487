#![forbid(unsafe_code)]

//! `trafficdesk` — chat-bot front end for a micro-task traffic
//! marketplace.
//!
//! Bootstraps configuration, connects the store, starts the Slack
//! Socket Mode integration, and runs the background report and dialog
//! expiry tasks until a shutdown signal arrives.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use trafficdesk::config::GlobalConfig;
use trafficdesk::persistence::db;
use trafficdesk::reports;
use trafficdesk::slack::client::SlackService;
use trafficdesk::state::{AppState, AppStateSlot};
use trafficdesk::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "trafficdesk", about = "Micro-task marketplace chat bot", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Override the database path from the config file.
    #[arg(long)]
    db: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("trafficdesk bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let mut config = GlobalConfig::load_from_path(&args.config)?;
    if let Some(db_path) = args.db {
        config.db_path = db_path;
    }

    // Slack credentials come from keyring / env vars, never the file.
    if let Err(err) = config.load_credentials().await {
        info!(%err, "slack credentials unavailable; running store-only");
    }

    let config = Arc::new(config);
    info!("configuration loaded");

    let db_path = config.db_path.to_string_lossy().to_string();
    let db = Arc::new(db::connect(&db_path).await?);
    info!("database connected");

    // The listener starts before the final state exists; it reads this
    // slot on each event.
    let slot = Arc::new(AppStateSlot::default());
    let (slack_service, slack_runtime) = if config.slack.bot_token.is_empty() {
        info!("slack not configured; chat surface disabled");
        (None, None)
    } else {
        let (svc, runtime) =
            SlackService::start(&config.slack, Arc::clone(&slot)).map_err(|err| {
                error!(%err, "slack service start failed");
                err
            })?;
        info!("slack service started");
        (Some(Arc::new(svc)), Some(runtime))
    };

    let state = Arc::new(AppState::new(
        Arc::clone(&config),
        db,
        slack_service,
    ));
    slot.fill(Arc::clone(&state));

    let ct = CancellationToken::new();
    let report_handle = reports::spawn_report_task(Arc::clone(&state), ct.clone());
    let prune_handle = reports::spawn_dialog_prune_task(Arc::clone(&state), ct.clone());
    info!("background tasks started");

    shutdown_signal().await;
    info!("shutdown signal received");
    ct.cancel();

    let _ = tokio::join!(report_handle, prune_handle);
    if let Some(runtime) = slack_runtime {
        runtime.queue_task.abort();
        runtime.socket_task.abort();
    }
    state.db.close().await;
    info!("trafficdesk shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
