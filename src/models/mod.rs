//! Domain entity models.

pub mod admin;
pub mod pending;
pub mod task;
pub mod tracking;
pub mod user;
pub mod user_task;
