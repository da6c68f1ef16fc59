//! Wall-clock helpers.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis()
}

/// Absolute expiry `ttl` from now, in milliseconds since the Unix epoch.
#[must_use]
pub fn expires_at_ms(ttl: Duration) -> u128 {
    now_ms().saturating_add(ttl.as_millis())
}
