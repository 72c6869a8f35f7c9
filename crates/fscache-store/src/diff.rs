// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use fscache_types::{FsEntry, Tree};

/// One unit of a pull-diff response: a node whose hash disagreed with the
/// client's observation, plus one level of its children. One level is
/// enough -- the client re-issues a pull against the newly observed child
/// hashes rather than the server walking arbitrarily deep up front.
#[derive(Debug, Clone, PartialEq)]
pub struct PushItem {
    pub uuid: String,
    pub merkle_hash: String,
    pub fs_entry: FsEntry,
    pub children: Vec<PushItem>,
}

/// A single client observation: the node it last saw and the hash it
/// last recorded for it.
#[derive(Debug, Clone)]
pub struct PullObservation {
    pub uuid: String,
    pub client_hash: String,
}

/// Computes the push items for a batch of client observations. Observations
/// naming a `uuid` unknown to the server are skipped silently -- the client
/// learns of the removal from a later full fetch, not from an error here.
pub fn pull_diff(tree: &Tree, observations: &[PullObservation]) -> Vec<PushItem> {
    let mut out = Vec::new();
    for obs in observations {
        let Some(node) = tree.get(&obs.uuid) else {
            tracing::debug!(uuid = %obs.uuid, "pull-diff: node not found, skipping");
            continue;
        };
        if node.merkle_hash == obs.client_hash {
            continue;
        }

        let children = node
            .children
            .iter()
            .filter_map(|child_uuid| tree.get(child_uuid))
            .map(|child| PushItem {
                uuid: child.uuid.clone(),
                merkle_hash: child.merkle_hash.clone(),
                fs_entry: child.fs_entry.clone(),
                children: Vec::new(),
            })
            .collect();

        out.push(PushItem {
            uuid: node.uuid.clone(),
            merkle_hash: node.merkle_hash.clone(),
            fs_entry: node.fs_entry.clone(),
            children,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fscache_merkle::full_bottom_up_hash;
    use fscache_types::Node;
    use serde_json::Map;
    use std::collections::HashMap;

    fn entry(uid: &str) -> FsEntry {
        let mut map = Map::new();
        map.insert("uid".into(), uid.into());
        FsEntry::new(map)
    }

    fn sample_tree() -> Tree {
        let mut nodes = HashMap::new();
        let mut root = Node::new_leaf("R".into(), "".into(), entry("R"));
        root.children.insert("A".into());
        let a = Node::new_leaf("A".into(), "R".into(), entry("A"));
        nodes.insert("R".to_string(), root);
        nodes.insert("A".to_string(), a);
        let mut tree = Tree::new("R".to_string(), nodes);
        full_bottom_up_hash(&mut tree).unwrap();
        tree
    }

    #[test]
    fn empty_diff_when_hashes_all_match() {
        let tree = sample_tree();
        let observations: Vec<PullObservation> = tree
            .nodes
            .values()
            .map(|n| PullObservation {
                uuid: n.uuid.clone(),
                client_hash: n.merkle_hash.clone(),
            })
            .collect();

        assert!(pull_diff(&tree, &observations).is_empty());
    }

    #[test]
    fn mismatched_hash_returns_node_and_children() {
        let tree = sample_tree();
        let observations = vec![PullObservation {
            uuid: "R".to_string(),
            client_hash: "stale".to_string(),
        }];

        let items = pull_diff(&tree, &observations);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].uuid, "R");
        assert_eq!(items[0].children.len(), 1);
        assert_eq!(items[0].children[0].uuid, "A");
    }

    #[test]
    fn unknown_uuid_is_skipped_silently() {
        let tree = sample_tree();
        let observations = vec![PullObservation {
            uuid: "ghost".to_string(),
            client_hash: "anything".to_string(),
        }];
        assert!(pull_diff(&tree, &observations).is_empty());
    }

    /// Mutating a leaf changes its own hash and every ancestor's up to the
    /// root; observations made against the pre-mutation hashes must produce
    /// exactly one push item per node on that path, and none for siblings.
    #[test]
    fn targeted_diff_returns_only_the_affected_ancestor_chain() {
        let mut tree = {
            let mut nodes = HashMap::new();
            let mut root = Node::new_leaf("R".into(), "".into(), entry("R"));
            root.children.insert("A".into());
            root.children.insert("Z".into());
            let mut a = Node::new_leaf("A".into(), "R".into(), entry("A"));
            a.children.insert("B".into());
            let b = Node::new_leaf("B".into(), "A".into(), entry("B"));
            let z = Node::new_leaf("Z".into(), "R".into(), entry("Z"));
            nodes.insert("R".to_string(), root);
            nodes.insert("A".to_string(), a);
            nodes.insert("B".to_string(), b);
            nodes.insert("Z".to_string(), z);
            Tree::new("R".to_string(), nodes)
        };
        full_bottom_up_hash(&mut tree).unwrap();

        let stale_observations: Vec<PullObservation> = tree
            .nodes
            .values()
            .map(|n| PullObservation {
                uuid: n.uuid.clone(),
                client_hash: n.merkle_hash.clone(),
            })
            .collect();

        tree.nodes.get_mut("B").unwrap().fs_entry.metadata.insert("size".into(), 99.into());
        let new_hash = fscache_merkle::hash_node(&tree.nodes["B"].fs_entry, &[]);
        tree.nodes.get_mut("B").unwrap().merkle_hash = new_hash;
        fscache_merkle::recompute_ancestors(&mut tree, "B").unwrap();

        let items = pull_diff(&tree, &stale_observations);
        let uuids: std::collections::HashSet<String> = items.iter().map(|i| i.uuid.clone()).collect();
        assert_eq!(uuids, ["R", "A", "B"].iter().map(|s| s.to_string()).collect());
    }
}
