// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use crate::admission::{check_memory_usage, DEFAULT_MEMORY_THRESHOLD_BYTES};
use crate::loader::Loader;
use crate::tenant::Tenant;
use fscache_types::{CacheError, CacheResult, UserId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Default thresholds for the eviction loop: a tenant is purged once it has
/// gone unread for 60s, or unsynced for 300s, whichever comes first.
pub const DEFAULT_READ_TTL: Duration = Duration::from_secs(60);
pub const DEFAULT_SYNC_TTL: Duration = Duration::from_secs(300);

/// The global `user_id -> Tenant` map. The map lock guards only membership
/// and is held for O(1) work -- lookup, insert, delete -- never while a
/// tree operation or the loader is running.
pub struct Registry {
    tenants: RwLock<HashMap<UserId, Arc<Tenant>>>,
    loader: Arc<dyn Loader>,
    memory_threshold_bytes: u64,
}

impl Registry {
    pub fn new(loader: Arc<dyn Loader>) -> Self {
        Self::with_memory_threshold(loader, DEFAULT_MEMORY_THRESHOLD_BYTES)
    }

    pub fn with_memory_threshold(loader: Arc<dyn Loader>, memory_threshold_bytes: u64) -> Self {
        Self {
            tenants: RwLock::new(HashMap::new()),
            loader,
            memory_threshold_bytes,
        }
    }

    /// Acquisition protocol for readers (fetch, pull-diff): look the tenant
    /// up under the map's read lock; if absent, run the admission check and
    /// loader entirely outside any lock, then install under the map's write
    /// lock -- re-checking presence to resolve a race against a concurrent
    /// loader for the same user, preferring whichever tenant won the race.
    pub fn get_readable(&self, user_id: UserId) -> CacheResult<Arc<Tenant>> {
        if let Some(tenant) = self.tenants.read().get(&user_id).cloned() {
            tenant.touch_read();
            return Ok(tenant);
        }

        check_memory_usage(self.memory_threshold_bytes)?;
        let tree = self.loader.load(user_id)?;
        let freshly_loaded = Arc::new(Tenant::new(tree));

        let tenant = {
            let mut tenants = self.tenants.write();
            tenants.entry(user_id).or_insert_with(|| freshly_loaded.clone()).clone()
        };
        tenant.touch_read();
        Ok(tenant)
    }

    /// Acquisition protocol for writers (create, remove): writers never
    /// lazily materialize a tenant -- they presuppose a prior read by the
    /// same caller, so absence is a hard `NotFound`.
    pub fn get_writable(&self, user_id: UserId) -> CacheResult<Arc<Tenant>> {
        self.tenants
            .read()
            .get(&user_id)
            .cloned()
            .ok_or(CacheError::TenantNotFound(user_id))
    }

    /// Drops the tenant for `user_id`. Idempotent -- purging an absent
    /// tenant is not an error. In-flight operations holding a reference to
    /// the tenant continue to completion; they captured the `Arc` before
    /// the drop.
    pub fn purge(&self, user_id: UserId) {
        self.tenants.write().remove(&user_id);
    }

    pub fn tenant_count(&self) -> usize {
        self.tenants.read().len()
    }

    pub fn total_nodes_cached(&self) -> usize {
        self.tenants.read().values().map(|t| t.node_count()).sum()
    }

    /// One sweep of the eviction loop: drop every tenant whose `last_read`
    /// is older than `read_ttl` or whose `last_synced` is older than
    /// `sync_ttl`. Returns the number of tenants purged.
    pub fn evict_stale(&self, read_ttl: Duration, sync_ttl: Duration) -> usize {
        let now = Instant::now();
        let mut tenants = self.tenants.write();
        let to_delete: Vec<UserId> = tenants
            .iter()
            .filter(|(_, tenant)| {
                now.saturating_duration_since(tenant.last_read()) > read_ttl
                    || now.saturating_duration_since(tenant.last_synced()) > sync_ttl
            })
            .map(|(user_id, _)| *user_id)
            .collect();

        for user_id in &to_delete {
            tenants.remove(user_id);
        }
        to_delete.len()
    }
}
