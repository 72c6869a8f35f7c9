// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use crate::hasher::hash_node;
use fscache_types::{CacheError, CacheResult, NodeId, Tree};
use std::collections::HashSet;

/// Computes every node's `merkle_hash` from scratch via a fixed-point,
/// bottom-up sweep: leaves first, then any node whose children are all
/// already processed, repeated until a pass makes no progress. A remaining
/// unprocessed node after the fixed point is reached means the tree has a
/// cycle or a dangling child reference -- both are invariant violations the
/// loader must reject rather than paper over.
pub fn full_bottom_up_hash(tree: &mut Tree) -> CacheResult<()> {
    let mut processed: HashSet<NodeId> = HashSet::with_capacity(tree.nodes.len());
    let mut remaining: Vec<NodeId> = tree.nodes.keys().cloned().collect();

    loop {
        let mut made_progress = false;
        let mut still_remaining = Vec::with_capacity(remaining.len());

        for uuid in remaining {
            let children: Vec<NodeId> = tree
                .nodes
                .get(&uuid)
                .expect("uuid drawn from tree.nodes keys")
                .children
                .iter()
                .cloned()
                .collect();

            if children.iter().all(|c| processed.contains(c)) {
                let child_hashes: Vec<String> = children
                    .iter()
                    .map(|c| {
                        tree.nodes
                            .get(c)
                            .map(|n| n.merkle_hash.clone())
                            .unwrap_or_default()
                    })
                    .collect();
                let node = tree.nodes.get_mut(&uuid).expect("uuid exists in tree.nodes");
                node.merkle_hash = hash_node(&node.fs_entry, &child_hashes);
                processed.insert(uuid);
                made_progress = true;
            } else {
                still_remaining.push(uuid);
            }
        }

        if still_remaining.is_empty() {
            return Ok(());
        }
        if !made_progress {
            return Err(CacheError::Corruption {
                user_id: 0,
                detail: format!(
                    "bottom-up hash could not make progress on {} node(s); cycle or dangling child reference",
                    still_remaining.len()
                ),
            });
        }
        remaining = still_remaining;
    }
}

/// Walks from `start` to the root by `parent_uuid`, recomputing each node's
/// hash from its children's current hashes as it goes. Stops when it steps
/// onto the root (`parent_uuid` empty) or onto a missing parent, which is
/// treated as corruption: a non-root node's parent must always resolve.
pub fn recompute_ancestors(tree: &mut Tree, start: &str) -> CacheResult<()> {
    let mut current = start.to_string();
    loop {
        let (parent_uuid, is_root) = {
            let node = tree
                .nodes
                .get(&current)
                .ok_or_else(|| CacheError::NodeNotFound(current.clone()))?;
            (node.parent_uuid.clone(), node.is_root())
        };

        let child_hashes: Vec<String> = {
            let node = tree.nodes.get(&current).expect("current node exists");
            node.children
                .iter()
                .map(|c| {
                    tree.nodes
                        .get(c)
                        .map(|n| n.merkle_hash.clone())
                        .unwrap_or_default()
                })
                .collect()
        };

        let node = tree.nodes.get_mut(&current).expect("current node exists");
        node.merkle_hash = hash_node(&node.fs_entry, &child_hashes);

        if is_root {
            return Ok(());
        }

        if !tree.nodes.contains_key(&parent_uuid) {
            return Err(CacheError::Corruption {
                user_id: 0,
                detail: format!("node {current} has unresolvable parent {parent_uuid}"),
            });
        }
        current = parent_uuid;
    }
}

/// Produces the transitive set of `uuid`'s descendants (not including
/// `uuid` itself), via depth-first traversal over `children`.
pub fn collect_descendants(tree: &Tree, uuid: &str) -> HashSet<NodeId> {
    let mut out = HashSet::new();
    let mut stack: Vec<NodeId> = tree
        .nodes
        .get(uuid)
        .map(|n| n.children.iter().cloned().collect())
        .unwrap_or_default();

    while let Some(next) = stack.pop() {
        if out.insert(next.clone()) {
            if let Some(node) = tree.nodes.get(&next) {
                stack.extend(node.children.iter().cloned());
            }
        }
    }

    out
}
