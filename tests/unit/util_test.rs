//! Tests for utility functions

use std::time::Duration;

use prometheus_sweeper::util::{DEFAULT_LOG_DIRECTIVE, expires_at_ms, init_tracing, now_ms};

#[test]
fn test_expiry_is_in_the_future() {
    let before = now_ms();
    let expiry = expires_at_ms(Duration::from_secs(60));
    assert!(expiry >= before + 60_000);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    assert!(tracing::dispatcher::has_been_set());
}

#[test]
fn test_default_directive_targets_crate() {
    assert!(DEFAULT_LOG_DIRECTIVE.starts_with("prometheus_sweeper"));
}
