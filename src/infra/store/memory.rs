//! In-memory policy store ordered by id.

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::core::{Policy, PolicyId, PolicyScope, PolicyStore, SweepError};

/// Policy store backed by a `BTreeMap`, for development and tests.
///
/// Pages are produced by a range scan starting just after the requested id,
/// so walking a scope never copies the whole collection.
#[derive(Default)]
pub struct InMemoryPolicyStore {
    policies: RwLock<BTreeMap<PolicyId, Policy>>,
}

impl InMemoryPolicyStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `policies`.
    pub fn from_policies(policies: impl IntoIterator<Item = Policy>) -> Self {
        let store = Self::new();
        for policy in policies {
            store.upsert(policy);
        }
        store
    }

    /// Insert or replace a policy.
    pub fn upsert(&self, policy: Policy) {
        self.policies.write().insert(policy.id, policy);
    }

    /// Flip the enabled flag. Returns `false` if the policy is unknown.
    pub fn set_enabled(&self, id: PolicyId, enabled: bool) -> bool {
        self.policies
            .write()
            .get_mut(&id)
            .map(|policy| policy.enabled = enabled)
            .is_some()
    }

    /// Remove a policy, returning it if present.
    pub fn remove(&self, id: PolicyId) -> Option<Policy> {
        self.policies.write().remove(&id)
    }

    /// Number of stored policies, enabled or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.read().len()
    }

    /// True if the store holds no policies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.read().is_empty()
    }
}

#[async_trait]
impl PolicyStore for InMemoryPolicyStore {
    async fn fetch_page(
        &self,
        scope: &PolicyScope,
        after: Option<PolicyId>,
        limit: usize,
    ) -> Result<Vec<Policy>, SweepError> {
        let lower = after.map_or(Bound::Unbounded, Bound::Excluded);
        let policies = self.policies.read();
        Ok(policies
            .range((lower, Bound::Unbounded))
            .map(|(_, policy)| policy)
            .filter(|policy| policy.enabled && scope.matches(policy.id))
            .take(limit)
            .cloned()
            .collect())
    }
}
