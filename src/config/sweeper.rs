//! Sweeper configuration.
//!
//! # Example
//!
//! ```json
//! {
//!     "per_thread_budget": 5,
//!     "max_budget": 300,
//!     "per_account_budget": 5,
//!     "queue_name": "cleanup",
//!     "cursor_ttl_secs": 3600,
//!     "interval_secs": 60
//! }
//! ```
//!
//! Every field is optional; omitted fields take the defaults below. The same
//! fields can be set from the environment as `SWEEPER_<FIELD>` (upper case).

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{BudgetLimits, SweepSettings};

/// Root sweeper configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweeperConfig {
    /// Units granted per live downstream worker.
    /// Default: 5
    #[serde(default = "default_per_thread_budget")]
    pub per_thread_budget: u32,

    /// Ceiling on a run's budget regardless of capacity.
    /// Default: 300
    #[serde(default = "default_max_budget")]
    pub max_budget: u32,

    /// Ceiling on units a single policy may receive per visit.
    /// Default: 5
    #[serde(default = "default_per_account_budget")]
    pub per_account_budget: u32,

    /// Work queue whose live workers size the budget.
    /// Default: "cleanup"
    #[serde(default = "default_queue_name")]
    pub queue_name: String,

    /// Key of the persisted cursor slot.
    #[serde(default = "default_cursor_key")]
    pub cursor_key: String,

    /// Cursor expiry in seconds.
    /// Default: 3600
    #[serde(default = "default_cursor_ttl_secs")]
    pub cursor_ttl_secs: u64,

    /// Key of the run lock.
    #[serde(default = "default_lock_key")]
    pub lock_key: String,

    /// Run lock lease in seconds; a safety net against crashed holders.
    /// Default: 21600 (6 hours)
    #[serde(default = "default_lock_ttl_secs")]
    pub lock_ttl_secs: u64,

    /// Seconds between triggers of the periodic worker.
    /// Default: 60
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Policies fetched per store page.
    /// Default: 100
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            per_thread_budget: default_per_thread_budget(),
            max_budget: default_max_budget(),
            per_account_budget: default_per_account_budget(),
            queue_name: default_queue_name(),
            cursor_key: default_cursor_key(),
            cursor_ttl_secs: default_cursor_ttl_secs(),
            lock_key: default_lock_key(),
            lock_ttl_secs: default_lock_ttl_secs(),
            interval_secs: default_interval_secs(),
            page_size: default_page_size(),
        }
    }
}

const fn default_per_thread_budget() -> u32 {
    5
}

const fn default_max_budget() -> u32 {
    300
}

const fn default_per_account_budget() -> u32 {
    5
}

fn default_queue_name() -> String {
    "cleanup".into()
}

fn default_cursor_key() -> String {
    "cleanup_sweep:last_policy_id".into()
}

const fn default_cursor_ttl_secs() -> u64 {
    3600
}

fn default_lock_key() -> String {
    "cleanup_sweep:run_lock".into()
}

const fn default_lock_ttl_secs() -> u64 {
    6 * 3600
}

const fn default_interval_secs() -> u64 {
    60
}

const fn default_page_size() -> usize {
    100
}

impl SweeperConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.per_thread_budget == 0 {
            return Err("per_thread_budget must be greater than 0".into());
        }
        if self.max_budget == 0 {
            return Err("max_budget must be greater than 0".into());
        }
        if self.per_account_budget == 0 {
            return Err("per_account_budget must be greater than 0".into());
        }
        if self.per_account_budget > self.max_budget {
            return Err("per_account_budget must not exceed max_budget".into());
        }
        if self.queue_name.trim().is_empty() {
            return Err("queue_name must not be empty".into());
        }
        if self.cursor_key.trim().is_empty() {
            return Err("cursor_key must not be empty".into());
        }
        if self.lock_key.trim().is_empty() {
            return Err("lock_key must not be empty".into());
        }
        if self.cursor_ttl_secs == 0 {
            return Err("cursor_ttl_secs must be greater than 0".into());
        }
        if self.lock_ttl_secs == 0 {
            return Err("lock_ttl_secs must be greater than 0".into());
        }
        if self.interval_secs == 0 {
            return Err("interval_secs must be greater than 0".into());
        }
        if self.page_size == 0 {
            return Err("page_size must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation error message.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from `SWEEPER_*` environment variables, reading a
    /// `.env` file first if one exists.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation error message.
    pub fn from_env() -> Result<Self, String> {
        // A missing .env file is the common case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup over the
    /// defaults, then validate.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation error message.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        override_parsed(&lookup, "SWEEPER_PER_THREAD_BUDGET", &mut cfg.per_thread_budget)?;
        override_parsed(&lookup, "SWEEPER_MAX_BUDGET", &mut cfg.max_budget)?;
        override_parsed(&lookup, "SWEEPER_PER_ACCOUNT_BUDGET", &mut cfg.per_account_budget)?;
        override_parsed(&lookup, "SWEEPER_QUEUE_NAME", &mut cfg.queue_name)?;
        override_parsed(&lookup, "SWEEPER_CURSOR_KEY", &mut cfg.cursor_key)?;
        override_parsed(&lookup, "SWEEPER_CURSOR_TTL_SECS", &mut cfg.cursor_ttl_secs)?;
        override_parsed(&lookup, "SWEEPER_LOCK_KEY", &mut cfg.lock_key)?;
        override_parsed(&lookup, "SWEEPER_LOCK_TTL_SECS", &mut cfg.lock_ttl_secs)?;
        override_parsed(&lookup, "SWEEPER_INTERVAL_SECS", &mut cfg.interval_secs)?;
        override_parsed(&lookup, "SWEEPER_PAGE_SIZE", &mut cfg.page_size)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Budget ceilings for the planner.
    #[must_use]
    pub const fn budget_limits(&self) -> BudgetLimits {
        BudgetLimits {
            per_thread_budget: self.per_thread_budget,
            max_budget: self.max_budget,
        }
    }

    /// Settings for the sweep controller.
    #[must_use]
    pub fn sweep_settings(&self) -> SweepSettings {
        SweepSettings {
            per_account_budget: self.per_account_budget,
            cursor_key: self.cursor_key.clone(),
            cursor_ttl: self.cursor_ttl(),
            page_size: self.page_size,
        }
    }

    /// Cursor expiry.
    #[must_use]
    pub const fn cursor_ttl(&self) -> Duration {
        Duration::from_secs(self.cursor_ttl_secs)
    }

    /// Run lock lease.
    #[must_use]
    pub const fn lock_ttl(&self) -> Duration {
        Duration::from_secs(self.lock_ttl_secs)
    }

    /// Interval between periodic triggers.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

fn override_parsed<F, T>(lookup: &F, name: &str, slot: &mut T) -> Result<(), String>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(name) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|e| format!("{name}: invalid value `{raw}`: {e}"))?;
    }
    Ok(())
}
