//! Tests for configuration validation

use std::time::Duration;

use prometheus_sweeper::config::SweeperConfig;

#[test]
fn test_default_config_is_valid() {
    let cfg = SweeperConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.per_thread_budget, 5);
    assert_eq!(cfg.max_budget, 300);
    assert_eq!(cfg.per_account_budget, 5);
    assert_eq!(cfg.queue_name, "cleanup");
    assert_eq!(cfg.cursor_key, "cleanup_sweep:last_policy_id");
    assert_eq!(cfg.lock_ttl(), Duration::from_secs(6 * 3600));
    assert_eq!(cfg.interval(), Duration::from_secs(60));
}

#[test]
fn test_config_invalid_per_thread_budget() {
    let invalid = SweeperConfig {
        per_thread_budget: 0,
        ..SweeperConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_invalid_account_budget() {
    let invalid = SweeperConfig {
        per_account_budget: 0,
        ..SweeperConfig::default()
    };
    assert!(invalid.validate().is_err());

    let too_large = SweeperConfig {
        max_budget: 10,
        per_account_budget: 11,
        ..SweeperConfig::default()
    };
    assert!(too_large.validate().is_err());
}

#[test]
fn test_config_invalid_keys() {
    let invalid = SweeperConfig {
        cursor_key: "  ".to_string(),
        ..SweeperConfig::default()
    };
    assert!(invalid.validate().is_err());

    let invalid = SweeperConfig {
        lock_key: String::new(),
        ..SweeperConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_invalid_page_size() {
    let invalid = SweeperConfig {
        page_size: 0,
        ..SweeperConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "per_thread_budget": 10,
        "max_budget": 500,
        "queue_name": "retention",
        "cursor_ttl_secs": 600
    }"#;

    let cfg = SweeperConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.per_thread_budget, 10);
    assert_eq!(cfg.max_budget, 500);
    assert_eq!(cfg.queue_name, "retention");
    assert_eq!(cfg.sweep_settings().cursor_ttl, Duration::from_secs(600));
    assert_eq!(cfg.per_account_budget, 5);
}

#[test]
fn test_config_from_json_rejects_unknown_fields() {
    let err = SweeperConfig::from_json_str(r#"{ "max_units": 100 }"#).unwrap_err();
    assert!(err.starts_with("parse error"));
}

#[test]
fn test_config_from_json_validates() {
    assert!(SweeperConfig::from_json_str(r#"{ "max_budget": 0 }"#).is_err());
}
