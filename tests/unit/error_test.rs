//! Tests for error types

use prometheus_sweeper::core::{PolicyId, SweepError};

#[test]
fn test_capacity_registry_error() {
    let err = SweepError::CapacityRegistry("registry timed out".to_string());
    assert_eq!(format!("{}", err), "capacity registry error: registry timed out");
}

#[test]
fn test_executor_error_names_policy() {
    let err = SweepError::Executor {
        policy: PolicyId(17),
        message: "purge rejected: quota".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "executor failed for policy 17: purge rejected: quota"
    );
}

#[test]
fn test_executor_overrun_error() {
    let err = SweepError::ExecutorOverrun {
        policy: PolicyId(3),
        requested: 5,
        produced: 9,
    };
    assert_eq!(
        format!("{}", err),
        "executor overran cap for policy 3: requested 5, produced 9"
    );
}

#[test]
fn test_cursor_store_error() {
    let err = SweepError::CursorStore("connection refused".to_string());
    assert_eq!(format!("{}", err), "cursor store error: connection refused");
}

#[test]
fn test_invalid_config_error() {
    let err = SweepError::InvalidConfig("max_budget must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: max_budget must be greater than 0"
    );
}
