// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use fscache_types::Tree;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::time::Instant;

/// One user's cached tree plus the bookkeeping the eviction loop needs.
/// `last_read`/`last_synced` live outside the tree's own lock: the eviction
/// loop only ever consults them under the registry's map lock, never the
/// tenant lock, so a tenant mid-operation never blocks a sweep.
pub struct Tenant {
    tree: RwLock<Tree>,
    last_read: RwLock<Instant>,
    last_synced: RwLock<Instant>,
}

impl Tenant {
    pub fn new(tree: Tree) -> Self {
        let now = Instant::now();
        Self {
            tree: RwLock::new(tree),
            last_read: RwLock::new(now),
            last_synced: RwLock::new(now),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Tree> {
        self.tree.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Tree> {
        self.tree.write()
    }

    pub fn touch_read(&self) {
        *self.last_read.write() = Instant::now();
    }

    pub fn last_read(&self) -> Instant {
        *self.last_read.read()
    }

    pub fn last_synced(&self) -> Instant {
        *self.last_synced.read()
    }

    pub fn node_count(&self) -> usize {
        self.tree.read().len()
    }
}
