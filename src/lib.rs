#![forbid(unsafe_code)]

//! `trafficdesk` — chat-bot front end for a micro-task traffic marketplace.
//!
//! Users claim advertising/traffic tasks, administrators hand out tracking
//! and work links through a chat group, and users submit completion proofs
//! for payout. The task lifecycle state machine lives in [`managers`] on
//! top of the `SQLite`-backed [`persistence`] layer; [`slack`] adapts the
//! chat transport; [`dialog`] tracks multi-step conversations.

pub mod config;
pub mod dialog;
pub mod errors;
pub mod ids;
pub mod managers;
pub mod models;
pub mod persistence;
pub mod reports;
pub mod slack;
pub mod state;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
