//! Error types for inventory access and tag mutation.

use crate::types::TagOperation;

/// Errors from enumerating or mutating the inventory.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// The boundary exists but the operator cannot act inside it.
    /// Fatal to that boundary's enumeration, not to the whole run.
    #[error("boundary access denied: {boundary}: {message}")]
    Authorization { boundary: String, message: String },

    /// A boundary or resource vanished between discovery and the operation.
    #[error("not found: {0}")]
    NotFound(String),

    /// The delete or merge call against a resource failed.
    #[error("tag {op} failed for `{key}` on {resource_id}: {message}")]
    Mutation {
        resource_id: String,
        key: String,
        op: TagOperation,
        message: String,
    },

    /// The `az` executable is not on PATH.
    #[error("az executable is not available in PATH")]
    NotInstalled,

    /// The `az` CLI exited non-zero for a reason that maps to no
    /// richer variant.
    #[error("az command failed: az {args} ({message})")]
    CommandFailed { args: String, message: String },

    /// The `az` CLI produced output this client cannot parse.
    #[error("unable to parse az output: {0}")]
    Parse(String),
}

impl InventoryError {
    /// True when the error means the whole boundary should be skipped
    /// rather than the run aborted.
    pub fn is_boundary_skip(&self) -> bool {
        matches!(self, Self::Authorization { .. } | Self::NotFound(_))
    }
}
