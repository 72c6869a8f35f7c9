// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use fscache_merkle::{collect_descendants, hash_node, recompute_ancestors};
use fscache_types::{CacheError, CacheResult, FsEntry, Node, Tree, UserId};

/// Inserts a new node under its resolved parent and restores the Merkle
/// invariant along the path to the root. Overwrites any existing node with
/// the same `uid`, which is documented behavior rather than an oversight:
/// callers may legitimately re-push an entry they already created.
pub fn create_entry(tree: &mut Tree, user_id: UserId, fs_entry: FsEntry) -> CacheResult<()> {
    let uid = fs_entry
        .uid()
        .ok_or_else(|| CacheError::InvalidArgument("missing uid".to_string()))?
        .to_string();
    let parent_uid = fs_entry
        .parent_uid()
        .ok_or_else(|| CacheError::InvalidArgument("missing parent_uid".to_string()))?
        .to_string();
    if parent_uid.is_empty() {
        return Err(CacheError::InvalidArgument("parent_uid is empty".to_string()));
    }
    let dirpath = fs_entry
        .dirpath()
        .ok_or_else(|| CacheError::InvalidArgument("missing dirpath".to_string()))?
        .to_string();

    let resolved_parent = resolve_parent(tree, &parent_uid, &dirpath, user_id)?;

    let mut node = Node::new_leaf(uid.clone(), resolved_parent.clone(), fs_entry);
    node.merkle_hash = hash_node(&node.fs_entry, &[]);
    tree.nodes.insert(uid.clone(), node);

    let parent = tree
        .nodes
        .get_mut(&resolved_parent)
        .expect("resolved_parent was just confirmed present");
    parent.children.insert(uid.clone());

    recompute_ancestors(tree, &uid)
}

/// `parent_uid` is the id-addressed parent; `dirpath` is the path-addressed
/// one. When the node at `parent_uid` exists and its stored `path` agrees
/// with `dirpath`, the two addressing schemes concur and `parent_uid` is
/// used directly. Otherwise upstream moves have not yet propagated the
/// id-addressed parent, and the path wins: a linear scan locates the node
/// whose `path` equals `dirpath`.
fn resolve_parent(tree: &Tree, parent_uid: &str, dirpath: &str, user_id: UserId) -> CacheResult<String> {
    if let Some(parent) = tree.nodes.get(parent_uid) {
        if parent.fs_entry.path() == Some(dirpath) {
            return Ok(parent_uid.to_string());
        }
        tracing::warn!(
            user_id,
            parent_uid,
            dirpath,
            stored_path = parent.fs_entry.path(),
            "parent_uid and dirpath disagree; resolving by path"
        );
    }

    tree.nodes
        .values()
        .find(|n| n.fs_entry.path() == Some(dirpath))
        .map(|n| n.uuid.clone())
        .ok_or_else(|| CacheError::ParentNotFound(dirpath.to_string()))
}

/// Removes a node and every descendant, then rehashes the ancestor chain
/// from the former parent. A parent that does not list the node as a child
/// is corruption, not a missing-argument error: the tree's own bookkeeping
/// has drifted from itself.
pub fn remove_entry(tree: &mut Tree, user_id: UserId, uuid: &str) -> CacheResult<()> {
    if uuid.is_empty() {
        return Err(CacheError::InvalidArgument("missing uuid".to_string()));
    }
    let target = tree
        .nodes
        .get(uuid)
        .ok_or_else(|| CacheError::NodeNotFound(uuid.to_string()))?;
    let parent_uuid = target.parent_uuid.clone();

    let descendants = collect_descendants(tree, uuid);

    if !parent_uuid.is_empty() {
        let parent = tree.nodes.get_mut(&parent_uuid).ok_or_else(|| CacheError::Corruption {
            user_id,
            detail: format!("node {uuid}'s parent {parent_uuid} does not exist"),
        })?;
        if !parent.children.remove(uuid) {
            return Err(CacheError::Corruption {
                user_id,
                detail: format!("parent {parent_uuid} does not list {uuid} as a child"),
            });
        }
    }

    for descendant in &descendants {
        tree.nodes.remove(descendant);
    }
    tree.nodes.remove(uuid);

    if !parent_uuid.is_empty() {
        recompute_ancestors(tree, &parent_uuid)?;
    }

    Ok(())
}
