//! Tests for policy scopes and the in-memory store

use prometheus_sweeper::core::{Policy, PolicyId, PolicyScope, PolicyStore};
use prometheus_sweeper::infra::InMemoryPolicyStore;
use prometheus_sweeper::infra::store::render_page_query;

fn ids(policies: &[Policy]) -> Vec<u64> {
    policies.iter().map(|p| p.id.get()).collect()
}

#[tokio::test]
async fn test_union_yields_each_policy_once_in_order() {
    let store = InMemoryPolicyStore::from_policies((1..=8).map(Policy::enabled));
    let scope = PolicyScope::union(
        PolicyScope::RangeTo { to: PolicyId(3) },
        PolicyScope::IdSet {
            ids: vec![PolicyId(7), PolicyId(2), PolicyId(7)],
        },
    );

    let page = store.fetch_page(&scope, None, 10).await.unwrap();
    assert_eq!(ids(&page), vec![1, 2, 3, 7]);
}

#[tokio::test]
async fn test_disabled_policies_are_never_selected() {
    let store = InMemoryPolicyStore::from_policies([
        Policy::enabled(1u64),
        Policy::disabled(2u64),
        Policy::enabled(3u64),
    ]);
    let scope = PolicyScope::IdSet {
        ids: vec![PolicyId(2), PolicyId(3)],
    };

    assert_eq!(ids(&store.fetch_page(&scope, None, 10).await.unwrap()), vec![3]);

    assert!(store.set_enabled(PolicyId(2), true));
    assert_eq!(
        ids(&store.fetch_page(&scope, None, 10).await.unwrap()),
        vec![2, 3]
    );
}

#[tokio::test]
async fn test_pages_continue_after_last_id() {
    let store = InMemoryPolicyStore::from_policies((1..=5).map(Policy::enabled));
    let scope = PolicyScope::RangeFrom { from: PolicyId(2) };

    let first = store.fetch_page(&scope, None, 2).await.unwrap();
    assert_eq!(ids(&first), vec![2, 3]);
    let second = store.fetch_page(&scope, Some(PolicyId(3)), 2).await.unwrap();
    assert_eq!(ids(&second), vec![4, 5]);
    let third = store.fetch_page(&scope, Some(PolicyId(5)), 2).await.unwrap();
    assert!(third.is_empty());
}

#[test]
fn test_sql_rendering_matches_in_memory_semantics() {
    let scope = PolicyScope::union(
        PolicyScope::RangeTo { to: PolicyId(9) },
        PolicyScope::IdSet { ids: vec![] },
    );
    let query = render_page_query(&scope, None, 50).unwrap();
    assert!(query.sql.contains("(id <= $1 OR FALSE)"));
    assert!(query.sql.ends_with("ORDER BY id ASC LIMIT $2"));
}
