// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// The internal error taxonomy for the tree cache. The RPC layer maps each
/// variant onto the JSON-RPC error surface; see `fscache-rpc-api::RpcError`.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("tenant not found for user {0}")]
    TenantNotFound(i64),

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("parent not found: {0}")]
    ParentNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("source of record unavailable: {0}")]
    Unavailable(#[from] anyhow::Error),

    /// An invariant was found to be violated mid-operation. The tenant that
    /// produced this error is no longer trustworthy; per the design, recovery
    /// is a process restart followed by re-materialization from the source
    /// of record, not an attempt to patch the tree in place.
    #[error("tenant corruption detected for user {user_id}: {detail}")]
    Corruption { user_id: i64, detail: String },
}

impl CacheError {
    pub fn is_corruption(&self) -> bool {
        matches!(self, CacheError::Corruption { .. })
    }
}

pub type CacheResult<T> = Result<T, CacheError>;
