// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use fscache_types::{CacheError, CacheResult, Tree, UserId};
use std::fmt::Write as _;

/// Walks every node of `tree` and asserts the invariants of the data model:
/// the root resolves, every non-root node has a resolvable parent that
/// lists it as a child, every parent path is a prefix of the root's path,
/// and every listed child resolves. Expensive (O(N)); intended for use
/// after mutations in development/staging, not on the production hot path.
pub fn integrity_check(tree: &Tree, user_id: UserId) -> CacheResult<()> {
    let root = tree.root().ok_or_else(|| CacheError::Corruption {
        user_id,
        detail: format!("root uuid not found: {}", tree.root_uuid),
    })?;
    let root_path = root.fs_entry.path().unwrap_or_default();

    for (uuid, node) in &tree.nodes {
        if uuid != &node.uuid {
            return Err(CacheError::Corruption {
                user_id,
                detail: format!("uuid is inconsistent: {uuid} != {}", node.uuid),
            });
        }

        if node.uuid != tree.root_uuid {
            if node.parent_uuid.is_empty() {
                return Err(CacheError::Corruption {
                    user_id,
                    detail: format!("parent uuid is empty: {}", node.uuid),
                });
            }

            let parent = tree.nodes.get(&node.parent_uuid).ok_or_else(|| CacheError::Corruption {
                user_id,
                detail: format!("parent uuid not found: {}", node.parent_uuid),
            })?;

            if !parent.children.contains(&node.uuid) {
                return Err(CacheError::Corruption {
                    user_id,
                    detail: format!("parent does not have self as a child: {}", node.uuid),
                });
            }

            let parent_path = parent.fs_entry.path().unwrap_or_default();
            if !parent_path.starts_with(root_path) {
                return Err(CacheError::Corruption {
                    user_id,
                    detail: format!("parent path is not a prefix of root path: {parent_path}"),
                });
            }
        }

        for child_uuid in &node.children {
            if !tree.nodes.contains_key(child_uuid) {
                return Err(CacheError::Corruption {
                    user_id,
                    detail: format!("child uuid not found: {child_uuid}"),
                });
            }
        }
    }

    Ok(())
}

/// Renders `tree` as an indented ASCII tree, root first, children sorted by
/// path for stable output. For operator debugging: not exposed over RPC.
pub fn print_tree(tree: &Tree) -> String {
    let mut out = String::new();
    let Some(root) = tree.root() else {
        out.push_str("(root node not found)\n");
        return out;
    };

    let _ = writeln!(out, "Merkle Tree (Root: {})", tree.root_uuid);
    let _ = writeln!(out, "├── {}", node_display(root));
    print_children(tree, root, "│   ", &mut out);
    out
}

fn print_children(tree: &Tree, node: &fscache_types::Node, prefix: &str, out: &mut String) {
    if node.children.is_empty() {
        return;
    }

    let mut children: Vec<&fscache_types::Node> = node.children.iter().filter_map(|c| tree.nodes.get(c)).collect();
    children.sort_by_key(|n| n.fs_entry.path().unwrap_or_default().to_string());

    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        let is_last = i == count - 1;
        let (branch, next_prefix) = if is_last { ("└── ", "    ") } else { ("├── ", "│   ") };

        let _ = writeln!(out, "{prefix}{branch}{}", node_display(child));
        let nested_prefix = format!("{prefix}{next_prefix}");
        print_children(tree, child, &nested_prefix, out);
    }
}

fn node_display(node: &fscache_types::Node) -> String {
    let path = node.fs_entry.path().unwrap_or("[no path]");
    let name = node.fs_entry.name().unwrap_or("[no name]");
    let short_uuid = &node.uuid[..node.uuid.len().min(8)];
    format!("{path} [{name}] (uuid: {short_uuid})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fscache_merkle::full_bottom_up_hash;
    use fscache_types::{FsEntry, Node};
    use serde_json::Map;
    use std::collections::HashMap;

    fn entry(uid: &str, path: &str, name: &str) -> FsEntry {
        let mut map = Map::new();
        map.insert("uid".into(), uid.into());
        map.insert("path".into(), path.into());
        map.insert("name".into(), name.into());
        FsEntry::new(map)
    }

    fn sample_tree() -> Tree {
        let mut nodes = HashMap::new();
        let mut root = Node::new_leaf("R".into(), "".into(), entry("R", "/", "root"));
        root.children.insert("A".into());
        let a = Node::new_leaf("A".into(), "R".into(), entry("A", "/A", "A"));
        nodes.insert("R".to_string(), root);
        nodes.insert("A".to_string(), a);
        let mut tree = Tree::new("R".to_string(), nodes);
        full_bottom_up_hash(&mut tree).unwrap();
        tree
    }

    #[test]
    fn passes_on_a_well_formed_tree() {
        assert!(integrity_check(&sample_tree(), 1).is_ok());
    }

    #[test]
    fn detects_parent_missing_self_as_child() {
        let mut tree = sample_tree();
        tree.nodes.get_mut("R").unwrap().children.clear();
        let err = integrity_check(&tree, 1).unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn detects_dangling_child_reference() {
        let mut tree = sample_tree();
        tree.nodes.get_mut("R").unwrap().children.insert("ghost".into());
        let err = integrity_check(&tree, 1).unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn print_tree_includes_every_node_path() {
        let rendered = print_tree(&sample_tree());
        assert!(rendered.contains("/ [root]"));
        assert!(rendered.contains("/A [A]"));
    }
}
