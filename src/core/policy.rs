//! Policy identity and selection scopes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Totally ordered identity of a cleanup policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(pub u64);

impl PolicyId {
    /// Lowest possible identity; where a sweep starts without a cursor.
    pub const MIN: Self = Self(0);

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PolicyId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A per-account cleanup policy as seen by the sweeper.
///
/// Only the identity and the enabled flag are ever inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Identity used for ordering and cursor persistence.
    pub id: PolicyId,
    /// Disabled policies are never selected.
    pub enabled: bool,
}

impl Policy {
    /// Create an enabled policy.
    pub fn enabled(id: impl Into<PolicyId>) -> Self {
        Self {
            id: id.into(),
            enabled: true,
        }
    }

    /// Create a disabled policy.
    pub fn disabled(id: impl Into<PolicyId>) -> Self {
        Self {
            id: id.into(),
            enabled: false,
        }
    }
}

/// Store-agnostic description of which policy ids a pass selects.
///
/// Stores evaluate scopes against enabled policies only and always yield
/// matches in ascending id order. A `Union` yields each matching policy once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyScope {
    /// `id >= from`.
    RangeFrom {
        /// Inclusive lower bound.
        from: PolicyId,
    },
    /// `id <= to`.
    RangeTo {
        /// Inclusive upper bound.
        to: PolicyId,
    },
    /// `id` in the listed set. Duplicates are allowed and harmless.
    IdSet {
        /// Member ids.
        ids: Vec<PolicyId>,
    },
    /// Logical OR of two scopes.
    Union {
        /// First operand.
        left: Box<PolicyScope>,
        /// Second operand.
        right: Box<PolicyScope>,
    },
}

impl PolicyScope {
    /// Build a union of two scopes.
    #[must_use]
    pub fn union(left: Self, right: Self) -> Self {
        Self::Union {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Whether `id` falls inside this scope.
    #[must_use]
    pub fn matches(&self, id: PolicyId) -> bool {
        match self {
            Self::RangeFrom { from } => id >= *from,
            Self::RangeTo { to } => id <= *to,
            Self::IdSet { ids } => ids.contains(&id),
            Self::Union { left, right } => left.matches(id) || right.matches(id),
        }
    }

    /// True if no id can ever match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::RangeFrom { .. } | Self::RangeTo { .. } => false,
            Self::IdSet { ids } => ids.is_empty(),
            Self::Union { left, right } => left.is_empty() && right.is_empty(),
        }
    }

    /// Short human-readable rendering for logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::RangeFrom { from } => format!("id >= {from}"),
            Self::RangeTo { to } => format!("id <= {to}"),
            Self::IdSet { ids } => format!("id in set({})", ids.len()),
            Self::Union { left, right } => format!("({}) or ({})", left.describe(), right.describe()),
        }
    }
}
