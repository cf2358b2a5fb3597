//! Emptiness oracle: does a document have content, does it have children.
//!
//! The host answers through its RPC endpoints. This module holds the
//! contract, the statement builders, and the reducers that turn either
//! response shape into a [`DocStatus`].

use serde_json::Value;

use crate::error::OracleError;
use crate::host::Command;

/// What the oracle reports about one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocStatus {
    pub is_empty: bool,
    pub has_children: bool,
}

impl DocStatus {
    /// An empty document with children behaves as a folder.
    pub fn is_container(self) -> bool {
        self.is_empty && self.has_children
    }
}

/// Which query form is used to decide emptiness. Both are equivalent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OracleQuery {
    /// Character count from the document statistics endpoint.
    #[default]
    TreeStat,
    /// Count of non-directory blocks with non-empty content.
    ContentBlocks,
}

/// Asynchronous emptiness lookup. One best-effort attempt, no retries.
#[allow(async_fn_in_trait)]
pub trait EmptinessOracle {
    async fn inspect(&self, node_id: &str) -> Result<DocStatus, OracleError>;
}

/// Decide between expanding and opening a row after consulting the oracle.
///
/// Failures count as "not empty" so the document still opens.
pub async fn resolve<O, R>(oracle: &O, row: R, node_id: &str) -> Command<R>
where
    O: EmptinessOracle,
{
    match oracle.inspect(node_id).await {
        Ok(status) if status.is_container() => {
            log::debug!("{node_id} is an empty container, expanding");
            Command::Expand(row)
        }
        Ok(_) => Command::OpenDefault(row),
        Err(e) => {
            log::warn!("emptiness check for {node_id} failed: {e}");
            Command::OpenDefault(row)
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Node ids are timestamps with a short suffix, e.g. `20240101120000-abc1234`.
pub fn validate_id(node_id: &str) -> Result<&str, OracleError> {
    let valid = !node_id.is_empty()
        && node_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(node_id)
    } else {
        Err(OracleError::InvalidId(node_id.to_string()))
    }
}

/// Statement counting child documents of `node_id`.
pub fn child_count_stmt(node_id: &str) -> Result<String, OracleError> {
    let id = validate_id(node_id)?;
    Ok(format!(
        "SELECT count(*) AS count FROM blocks WHERE type = 'd' AND path LIKE '%/{id}/%'"
    ))
}

/// Statement counting non-directory blocks with text in `node_id`.
pub fn content_count_stmt(node_id: &str) -> Result<String, OracleError> {
    let id = validate_id(node_id)?;
    Ok(format!(
        "SELECT count(*) AS count FROM blocks WHERE root_id = '{id}' AND type != 'd' AND content != ''"
    ))
}

// ============================================================================
// Response Reducers
// ============================================================================

/// Unwrap the host's `{code, msg, data}` envelope.
pub fn unwrap_envelope(response: Value) -> Result<Value, OracleError> {
    let code = response.get("code").and_then(Value::as_i64).unwrap_or(0);
    if code != 0 {
        let msg = response
            .get("msg")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(OracleError::Rejected { code, msg });
    }
    response
        .get("data")
        .cloned()
        .ok_or_else(|| OracleError::Malformed("missing data".to_string()))
}

/// Character count from a statistics payload.
///
/// Accepts `{"runeCount": n}` and `{"stat": {"runeCount": n}}`.
pub fn rune_count(data: &Value) -> Result<u64, OracleError> {
    data.get("runeCount")
        .or_else(|| data.get("stat").and_then(|stat| stat.get("runeCount")))
        .and_then(Value::as_u64)
        .ok_or_else(|| OracleError::Malformed("no runeCount".to_string()))
}

/// First `count` column from SQL rows, e.g. `[{"count": 3}]`.
pub fn row_count(data: &Value) -> Result<u64, OracleError> {
    let first = data
        .as_array()
        .and_then(|rows| rows.first())
        .ok_or_else(|| OracleError::Malformed("no rows".to_string()))?;
    first
        .get("count")
        .and_then(|count| count.as_u64().or_else(|| count.as_str()?.parse().ok()))
        .ok_or_else(|| OracleError::Malformed("no count column".to_string()))
}
