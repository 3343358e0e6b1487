//! Unit tests for configuration parsing and validation.

use trafficdesk::GlobalConfig;

const VALID: &str = r#"
main_admin_id = "U0MAIN"
bot_entry_point = "https://example.com/bot"

[slack]
task_group_id = "C0TASKS"
report_group_id = "C0REPORTS"
"#;

#[test]
fn parses_valid_config_with_defaults() {
    let config = GlobalConfig::from_toml_str(VALID).expect("parse");
    assert_eq!(config.main_admin_id, "U0MAIN");
    assert_eq!(config.report_hour, 23);
    assert_eq!(config.dialog_ttl_seconds, 1800);
    assert_eq!(config.db_path.to_string_lossy(), "trafficdesk.db");
    assert_eq!(config.slack.task_group_id, "C0TASKS");
    assert!(config.slack.bot_token.is_empty());
}

#[test]
fn overrides_are_honored() {
    let raw = format!("report_hour = 7\ndialog_ttl_seconds = 60\ndb_path = \"x.db\"\n{VALID}");
    let config = GlobalConfig::from_toml_str(&raw).expect("parse");
    assert_eq!(config.report_hour, 7);
    assert_eq!(config.dialog_ttl_seconds, 60);
    assert_eq!(config.db_path.to_string_lossy(), "x.db");
}

#[test]
fn rejects_empty_main_admin() {
    let raw = VALID.replace("U0MAIN", " ");
    assert!(GlobalConfig::from_toml_str(&raw).is_err());
}

#[test]
fn rejects_out_of_range_report_hour() {
    let raw = format!("report_hour = 24\n{VALID}");
    assert!(GlobalConfig::from_toml_str(&raw).is_err());
}

#[test]
fn rejects_empty_group_ids() {
    let raw = VALID.replace("C0REPORTS", "");
    assert!(GlobalConfig::from_toml_str(&raw).is_err());
}

#[test]
fn tracking_url_appends_start_token() {
    let config = GlobalConfig::from_toml_str(VALID).expect("parse");
    assert_eq!(
        config.tracking_url("ab12cd34"),
        "https://example.com/bot?start=ab12cd34"
    );
}
