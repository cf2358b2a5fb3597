//! Error types for the core.
//!
//! - [`OracleError`] - emptiness queries against the host RPC
//! - [`HostError`] - missing or detached elements in the host tree
//!
//! Neither is ever surfaced to the host: callers log and fall back.

use thiserror::Error;

/// Failures of an emptiness query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// Node id contains characters that cannot be sent in a query.
    #[error("invalid node id: {0:?}")]
    InvalidId(String),
    /// Request could not be sent or timed out.
    #[error("transport error: {0}")]
    Transport(String),
    /// Host answered with a non-zero status code.
    #[error("host rejected query (code {code}): {msg}")]
    Rejected { code: i64, msg: String },
    /// Response did not contain the expected statistic.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Structural failures while acting on the host tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// Row has no toggle affordance to expand.
    #[error("row has no toggle")]
    MissingToggle,
    /// No row with this node id is rendered.
    #[error("row {0} not found in tree")]
    RowNotFound(String),
    /// Event could not be created or dispatched.
    #[error("dispatch failed: {0}")]
    DispatchFailed(String),
}
