// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

//! The JSON-RPC method surface for the filesystem Merkle-tree cache: the
//! `#[rpc(server, client)]` trait both the server and any Rust client derive
//! against, the wire-format view types, and the `RpcError` bridge onto
//! jsonrpsee's error surface.

pub mod api;
pub mod views;

pub use api::{FsCacheRpcClient, FsCacheRpcServer};
pub use views::{NodeView, PullObservationView, PushItemView, TreeView};

use fscache_types::CacheError;
use jsonrpsee::types::{ErrorObject, ErrorObjectOwned};
use thiserror::Error;

pub type RpcResult<T> = Result<T, RpcError>;

/// Bridges `fscache-types::CacheError` onto the JSON-RPC error surface.
/// Error codes below are this crate's own allocation, distinct from the
/// reserved JSON-RPC range; they give clients a stable way to branch on
/// the error kinds of §7 without string-matching the message.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    ResourceExhausted(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Internal(String),
}

impl From<CacheError> for RpcError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::TenantNotFound(_) | CacheError::NodeNotFound(_) | CacheError::ParentNotFound(_) => {
                RpcError::NotFound(err.to_string())
            }
            CacheError::InvalidArgument(msg) => RpcError::InvalidArgument(msg),
            CacheError::ResourceExhausted(msg) => RpcError::ResourceExhausted(msg),
            CacheError::Unavailable(cause) => RpcError::Unavailable(cause.to_string()),
            // A well-behaved caller never observes this: corruption aborts the
            // process before a response is formed (§7). Map it anyway so a
            // caller racing the abort gets a sensible error instead of a panic.
            CacheError::Corruption { .. } => RpcError::Internal(err.to_string()),
        }
    }
}

impl From<RpcError> for ErrorObjectOwned {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::NotFound(msg) => ErrorObject::owned(1, msg, None::<()>),
            RpcError::InvalidArgument(msg) => ErrorObject::owned(2, msg, None::<()>),
            RpcError::ResourceExhausted(msg) => ErrorObject::owned(3, msg, None::<()>),
            RpcError::Unavailable(msg) => ErrorObject::owned(4, msg, None::<()>),
            RpcError::Internal(msg) => ErrorObject::owned(5, msg, None::<()>),
        }
    }
}
