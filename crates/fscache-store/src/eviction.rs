// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use crate::registry::{Registry, DEFAULT_READ_TTL, DEFAULT_SYNC_TTL};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Spawns the background task that purges idle or stale tenants once per
/// `interval`. Mirrors `purgeOldTrees`, including its post-sweep summary
/// log line.
pub fn spawn_eviction_loop(registry: Arc<Registry>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let purged = registry.evict_stale(DEFAULT_READ_TTL, DEFAULT_SYNC_TTL);
            tracing::info!(
                purged,
                remaining = registry.tenant_count(),
                "purged {purged} old trees, {} trees remaining",
                registry.tenant_count()
            );
        }
    })
}
