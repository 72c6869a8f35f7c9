// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use crate::node::{Node, NodeId};
use std::collections::HashMap;

/// A tenant's full Merkle tree: a root pointer plus the flat node map it
/// addresses. `Tree` itself carries no lock or cache bookkeeping -- that is
/// the responsibility of the tenant wrapper in `fscache-store`.
#[derive(Debug, Clone)]
pub struct Tree {
    pub root_uuid: NodeId,
    pub nodes: HashMap<NodeId, Node>,
}

impl Tree {
    pub fn new(root_uuid: NodeId, nodes: HashMap<NodeId, Node>) -> Self {
        Self { root_uuid, nodes }
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.get(&self.root_uuid)
    }

    pub fn get(&self, uuid: &str) -> Option<&Node> {
        self.nodes.get(uuid)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
