//! Unit tests for button payload parsing.
//!
//! The parser is the boundary for interactive payloads: anything not in
//! the closed action set must come back as `None`.

use trafficdesk::models::task::TaskKind;
use trafficdesk::slack::events::{action_ids, Action};

#[test]
fn parses_menu_actions_without_payload() {
    assert_eq!(Action::parse(action_ids::MENU_MAIN, Some("-")), Some(Action::MainMenu));
    assert_eq!(
        Action::parse(action_ids::MENU_AVAILABLE, None),
        Some(Action::ListAvailable)
    );
    assert_eq!(
        Action::parse(action_ids::MENU_PROFILE, Some("ignored")),
        Some(Action::Profile)
    );
    assert_eq!(Action::parse(action_ids::MENU_HELP, None), Some(Action::Help));
}

#[test]
fn parses_task_actions_with_task_id() {
    assert_eq!(
        Action::parse(action_ids::TASK_TAKE, Some("ab12cd34")),
        Some(Action::TakeTask("ab12cd34".into()))
    );
    assert_eq!(
        Action::parse(action_ids::TASK_COMPLETE, Some("ab12cd34")),
        Some(Action::CompleteTask("ab12cd34".into()))
    );
}

#[test]
fn task_actions_without_payload_are_rejected() {
    assert_eq!(Action::parse(action_ids::TASK_TAKE, None), None);
    assert_eq!(Action::parse(action_ids::TASK_VIEW, Some("")), None);
    assert_eq!(Action::parse(action_ids::ADMIN_REMOVE, None), None);
}

#[test]
fn parses_kind_selection() {
    assert_eq!(
        Action::parse(action_ids::WIZARD_KIND, Some("ad_post")),
        Some(Action::SelectKind(TaskKind::AdPost))
    );
}

#[test]
fn unknown_kind_token_is_rejected() {
    assert_eq!(Action::parse(action_ids::WIZARD_KIND, Some("crypto")), None);
}

#[test]
fn unknown_action_id_is_rejected() {
    assert_eq!(Action::parse("approve_accept", Some("x")), None);
    assert_eq!(Action::parse("", None), None);
    assert_eq!(Action::parse("menu_mainx", Some("-")), None);
}
