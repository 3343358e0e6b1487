//! Unit tests for short identifier generation.

use trafficdesk::ids::{self, ID_LEN};

#[test]
fn short_id_is_eight_hex_chars() {
    let id = ids::short_id("My Task_2026-08-24T00:00:00Z");
    assert_eq!(id.len(), ID_LEN);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn same_seed_produces_different_ids() {
    let a = ids::short_id("seed");
    let b = ids::short_id("seed");
    assert_ne!(a, b);
}

#[test]
fn task_seed_combines_title_and_timestamp() {
    assert_eq!(
        ids::task_seed("Promo", "2026-08-24T00:00:00Z"),
        "Promo_2026-08-24T00:00:00Z"
    );
}

#[test]
fn tracking_seed_combines_user_and_task() {
    assert_eq!(ids::tracking_seed("U1", "t1"), "U1_t1");
}
