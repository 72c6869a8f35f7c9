// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

//! Shared data model for the filesystem Merkle-tree cache: the `FsEntry`
//! metadata payload, `Node`, `Tree`, and the error taxonomy the rest of the
//! workspace builds on.

pub mod entry;
pub mod error;
pub mod node;
pub mod tree;

pub use entry::FsEntry;
pub use error::{CacheError, CacheResult};
pub use node::{Node, NodeId};
pub use tree::Tree;

/// The external caller's identity for a tenant. The cache does not interpret
/// this beyond using it as a map key.
pub type UserId = i64;
