// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

//! Deterministic hashing and tree algorithms for the filesystem Merkle-tree
//! cache: canonical metadata serialization, the XXH64-based node hash, and
//! the bottom-up / incremental / descendant-collection algorithms that keep
//! a tree's hashes coherent across mutations.

pub mod algo;
pub mod canonical;
pub mod hasher;

pub use algo::{collect_descendants, full_bottom_up_hash, recompute_ancestors};
pub use canonical::canonical_map_bytes;
pub use hasher::hash_node;
