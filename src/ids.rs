//! Short hashed identifiers for tasks and tracking links.
//!
//! Identifiers are derived from a caller-supplied seed plus a random
//! salt, hashed and truncated to 8 hex characters. Collisions are
//! possible at this length, so insertion sites verify uniqueness and
//! call again with a fresh salt on conflict.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Number of hex characters in a generated identifier.
pub const ID_LEN: usize = 8;

/// Derive a short opaque identifier from `seed` and a random salt.
///
/// Each call produces a different value for the same seed.
#[must_use]
pub fn short_id(seed: &str) -> String {
    let salt = Uuid::new_v4();
    let digest = Sha256::digest(format!("{seed}:{salt}").as_bytes());
    digest
        .iter()
        .take(ID_LEN / 2)
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Seed for a task identifier: title plus creation timestamp.
#[must_use]
pub fn task_seed(title: &str, created_at: &str) -> String {
    format!("{title}_{created_at}")
}

/// Seed for a tracking-link identifier: claiming user plus task.
#[must_use]
pub fn tracking_seed(user_id: &str, task_id: &str) -> String {
    format!("{user_id}_{task_id}")
}
