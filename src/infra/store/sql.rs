//! Postgres rendering of policy scopes.
//!
//! Turns a [`PolicyScope`] page request into a parameterised query so a
//! database-backed [`crate::core::PolicyStore`] can evaluate scopes with an
//! index range scan instead of filtering in memory.

use crate::core::{PolicyId, PolicyScope, SweepError};

/// Table holding cleanup policies.
pub const POLICY_TABLE: &str = "cleanup_policies";

/// Bind parameter for a rendered query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    /// `BIGINT` value.
    BigInt(i64),
    /// `BIGINT[]` value.
    BigIntArray(Vec<i64>),
}

/// A rendered page query with positional `$n` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyPageQuery {
    /// SQL text.
    pub sql: String,
    /// Parameters in `$1..$n` order.
    pub params: Vec<SqlParam>,
}

/// Migration statements for the policy table.
#[must_use]
pub fn migrations() -> &'static [&'static str] {
    &[r"
CREATE TABLE IF NOT EXISTS cleanup_policies (
    id BIGINT PRIMARY KEY,
    enabled BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS idx_cleanup_policies_enabled_id ON cleanup_policies (id) WHERE enabled;
"]
}

/// Render the query for one page of enabled policies in `scope` with
/// `id > after`, ascending, at most `limit` rows.
///
/// # Errors
///
/// Returns [`SweepError::PolicyStore`] if an id or the limit does not fit in
/// a `BIGINT`.
pub fn render_page_query(
    scope: &PolicyScope,
    after: Option<PolicyId>,
    limit: usize,
) -> Result<PolicyPageQuery, SweepError> {
    let mut params = Vec::new();
    let predicate = render_scope(scope, &mut params)?;

    let mut sql = format!("SELECT id, enabled FROM {POLICY_TABLE} WHERE enabled AND {predicate}");
    if let Some(after) = after {
        params.push(SqlParam::BigInt(to_bigint(after)?));
        sql.push_str(&format!(" AND id > ${}", params.len()));
    }
    let limit = i64::try_from(limit)
        .map_err(|_| SweepError::PolicyStore(format!("page limit {limit} out of range")))?;
    params.push(SqlParam::BigInt(limit));
    sql.push_str(&format!(" ORDER BY id ASC LIMIT ${}", params.len()));

    Ok(PolicyPageQuery { sql, params })
}

fn render_scope(scope: &PolicyScope, params: &mut Vec<SqlParam>) -> Result<String, SweepError> {
    Ok(match scope {
        PolicyScope::RangeFrom { from } => {
            params.push(SqlParam::BigInt(to_bigint(*from)?));
            format!("id >= ${}", params.len())
        }
        PolicyScope::RangeTo { to } => {
            params.push(SqlParam::BigInt(to_bigint(*to)?));
            format!("id <= ${}", params.len())
        }
        PolicyScope::IdSet { ids } if ids.is_empty() => "FALSE".to_string(),
        PolicyScope::IdSet { ids } => {
            let ids = ids
                .iter()
                .map(|id| to_bigint(*id))
                .collect::<Result<Vec<_>, _>>()?;
            params.push(SqlParam::BigIntArray(ids));
            format!("id = ANY(${})", params.len())
        }
        PolicyScope::Union { left, right } => {
            let left = render_scope(left, params)?;
            let right = render_scope(right, params)?;
            format!("({left} OR {right})")
        }
    })
}

fn to_bigint(id: PolicyId) -> Result<i64, SweepError> {
    i64::try_from(id.get())
        .map_err(|_| SweepError::PolicyStore(format!("policy id {id} exceeds BIGINT range")))
}
