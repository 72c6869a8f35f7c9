// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use fscache_store::diff::{PullObservation, PushItem};
use fscache_types::{FsEntry, Node, Tree};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Wire form of a `Node`: the same fields, but with `children` rendered as
/// a `Vec` rather than a `BTreeSet` since JSON has no native set type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub uuid: String,
    pub parent_uuid: String,
    pub children: Vec<String>,
    pub fs_entry: FsEntry,
    pub merkle_hash: String,
}

impl From<&Node> for NodeView {
    fn from(node: &Node) -> Self {
        Self {
            uuid: node.uuid.clone(),
            parent_uuid: node.parent_uuid.clone(),
            children: node.children.iter().cloned().collect(),
            fs_entry: node.fs_entry.clone(),
            merkle_hash: node.merkle_hash.clone(),
        }
    }
}

/// Wire form of a full `Tree`, as returned by `FetchReplica`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeView {
    pub root_uuid: String,
    pub nodes: HashMap<String, NodeView>,
}

impl From<&Tree> for TreeView {
    fn from(tree: &Tree) -> Self {
        Self {
            root_uuid: tree.root_uuid.clone(),
            nodes: tree.nodes.iter().map(|(uuid, node)| (uuid.clone(), node.into())).collect(),
        }
    }
}

/// One `(uuid, hash)` observation a client sends in a `PullDiff` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullObservationView {
    pub uuid: String,
    pub hash: String,
}

impl From<PullObservationView> for PullObservation {
    fn from(view: PullObservationView) -> Self {
        PullObservation {
            uuid: view.uuid,
            client_hash: view.hash,
        }
    }
}

/// Wire form of a `PushItem`: a mismatched node plus one level of children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushItemView {
    pub uuid: String,
    pub merkle_hash: String,
    pub fs_entry: FsEntry,
    pub children: Vec<PushItemView>,
}

impl From<PushItem> for PushItemView {
    fn from(item: PushItem) -> Self {
        Self {
            uuid: item.uuid,
            merkle_hash: item.merkle_hash,
            fs_entry: item.fs_entry,
            children: item.children.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fscache_merkle::full_bottom_up_hash;
    use serde_json::Map;
    use std::collections::HashMap as StdHashMap;

    fn entry(uid: &str) -> FsEntry {
        let mut map = Map::new();
        map.insert("uid".into(), uid.into());
        FsEntry::new(map)
    }

    #[test]
    fn tree_view_round_trips_through_json() {
        let mut nodes = StdHashMap::new();
        let mut root = Node::new_leaf("R".into(), "".into(), entry("R"));
        root.children.insert("A".into());
        let a = Node::new_leaf("A".into(), "R".into(), entry("A"));
        nodes.insert("R".to_string(), root);
        nodes.insert("A".to_string(), a);
        let mut tree = Tree::new("R".to_string(), nodes);
        full_bottom_up_hash(&mut tree).unwrap();

        let view = TreeView::from(&tree);
        let json = serde_json::to_string(&view).unwrap();
        let round_tripped: TreeView = serde_json::from_str(&json).unwrap();
        assert_eq!(view, round_tripped);
        assert_eq!(round_tripped.nodes.get("R").unwrap().children, vec!["A".to_string()]);
    }
}
