// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use crate::metrics::ServiceMetrics;
use fscache_rpc_api::{FsCacheRpcServer, PullObservationView, PushItemView, RpcResult, TreeView};
use fscache_store::debug::integrity_check;
use fscache_store::{create_entry, pull_diff, remove_entry, Registry};
use fscache_types::{CacheResult, FsEntry, UserId};
use jsonrpsee::core::async_trait;
use std::sync::Arc;
use tracing::error;

/// Glue between the jsonrpsee-generated `FsCacheRpcServer` trait and the
/// in-memory registry: each method follows the acquisition protocol of
/// §4.3, runs the operation under the appropriate lock, and records a
/// call/error count against `metrics`.
#[derive(Clone)]
pub struct RpcService {
    registry: Arc<Registry>,
    metrics: Arc<ServiceMetrics>,
    /// Mirrors `server.debug` in the YAML config (§4.9): gates the
    /// expensive O(N) integrity walk after every mutation.
    debug: bool,
}

impl RpcService {
    pub fn new(registry: Arc<Registry>, metrics: Arc<ServiceMetrics>) -> Self {
        Self::with_debug(registry, metrics, false)
    }

    pub fn with_debug(registry: Arc<Registry>, metrics: Arc<ServiceMetrics>, debug: bool) -> Self {
        Self { registry, metrics, debug }
    }

    /// Converts a `CacheResult` into an `RpcResult`, recording the call
    /// outcome against `method`. Corruption (§7) is fatal for the process
    /// rather than something a caller can retry around.
    fn finish<T>(&self, method: &'static str, result: CacheResult<T>) -> RpcResult<T> {
        match result {
            Ok(value) => {
                self.metrics.record_success(method);
                Ok(value)
            }
            Err(err) if err.is_corruption() => {
                error!(method, %err, "tenant corruption detected; aborting process");
                std::process::abort();
            }
            Err(err) => {
                self.metrics.record_failure(method);
                Err(err.into())
            }
        }
    }

    /// Debug-only integrity walk after a mutation (§4.8). A violation here
    /// is the same fatal corruption path as everywhere else: the tenant is
    /// no longer trustworthy and a restart is the recovery.
    fn maybe_check_integrity(&self, tree: &fscache_types::Tree, user_id: UserId) {
        if !self.debug {
            return;
        }
        if let Err(err) = integrity_check(tree, user_id) {
            error!(user_id, %err, "post-mutation integrity check failed; aborting process");
            std::process::abort();
        }
    }
}

#[async_trait]
impl FsCacheRpcServer for RpcService {
    async fn fetch_replica(&self, user_id: UserId) -> RpcResult<TreeView> {
        let tenant = self.finish("fetch_replica", self.registry.get_readable(user_id))?;
        let tree = tenant.read();
        Ok(TreeView::from(&*tree))
    }

    async fn pull_diff(&self, user_id: UserId, observations: Vec<PullObservationView>) -> RpcResult<Vec<PushItemView>> {
        let tenant = self.finish("pull_diff", self.registry.get_readable(user_id))?;
        let tree = tenant.read();
        let observations: Vec<_> = observations.into_iter().map(Into::into).collect();
        let items = pull_diff(&tree, &observations);
        Ok(items.into_iter().map(Into::into).collect())
    }

    async fn new_fs_entry(&self, user_id: UserId, fs_entry: FsEntry) -> RpcResult<()> {
        let tenant = self.finish("new_fs_entry", self.registry.get_writable(user_id))?;
        let mut tree = tenant.write();
        self.finish("new_fs_entry", create_entry(&mut tree, user_id, fs_entry))?;
        self.maybe_check_integrity(&tree, user_id);
        Ok(())
    }

    async fn remove_fs_entry(&self, user_id: UserId, uuid: String) -> RpcResult<()> {
        let tenant = self.finish("remove_fs_entry", self.registry.get_writable(user_id))?;
        let mut tree = tenant.write();
        self.finish("remove_fs_entry", remove_entry(&mut tree, user_id, &uuid))?;
        self.maybe_check_integrity(&tree, user_id);
        Ok(())
    }

    async fn purge_replica(&self, user_id: UserId) -> RpcResult<()> {
        self.registry.purge(user_id);
        self.metrics.record_success("purge_replica");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fscache_store::Loader;
    use fscache_types::{CacheError, Node, Tree};
    use prometheus::Registry as PrometheusRegistry;
    use serde_json::Map;
    use std::collections::HashMap;

    struct StubLoader;
    impl Loader for StubLoader {
        fn load(&self, _user_id: UserId) -> CacheResult<Tree> {
            let mut nodes = HashMap::new();
            let mut root = Node::new_leaf("R".into(), "".into(), FsEntry::new({
                let mut m = Map::new();
                m.insert("uid".into(), "R".into());
                m.insert("path".into(), "/".into());
                m.insert("dirpath".into(), "/".into());
                m
            }));
            root.merkle_hash.clear();
            nodes.insert("R".to_string(), root);
            let mut tree = Tree::new("R".to_string(), nodes);
            fscache_merkle::full_bottom_up_hash(&mut tree).unwrap();
            Ok(tree)
        }
    }

    fn service() -> RpcService {
        let registry = Arc::new(Registry::new(Arc::new(StubLoader)));
        let metrics = Arc::new(ServiceMetrics::new(&PrometheusRegistry::new()));
        RpcService::new(registry, metrics)
    }

    #[tokio::test]
    async fn fetch_replica_lazily_loads_then_succeeds() {
        let service = service();
        let tree = service.fetch_replica(1).await.unwrap();
        assert_eq!(tree.root_uuid, "R");
    }

    #[tokio::test]
    async fn write_without_prior_read_is_not_found() {
        let service = service();
        let mut entry = Map::new();
        entry.insert("uid".into(), "n1".into());
        entry.insert("parent_uid".into(), "R".into());
        entry.insert("dirpath".into(), "/".into());
        let err = service.new_fs_entry(1, FsEntry::new(entry)).await.unwrap_err();
        assert!(matches!(err, fscache_rpc_api::RpcError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_then_remove_round_trips() {
        let service = service();
        service.fetch_replica(1).await.unwrap();

        let mut entry = Map::new();
        entry.insert("uid".into(), "n1".into());
        entry.insert("parent_uid".into(), "R".into());
        entry.insert("dirpath".into(), "/".into());
        service.new_fs_entry(1, FsEntry::new(entry)).await.unwrap();

        let tree = service.fetch_replica(1).await.unwrap();
        assert!(tree.nodes.contains_key("n1"));

        service.remove_fs_entry(1, "n1".to_string()).await.unwrap();
        let tree = service.fetch_replica(1).await.unwrap();
        assert!(!tree.nodes.contains_key("n1"));
    }

    #[tokio::test]
    async fn purge_then_refetch_reloads_from_the_source() {
        let service = service();
        service.fetch_replica(1).await.unwrap();
        service.purge_replica(1).await.unwrap();
        assert!(service.fetch_replica(1).await.is_ok());
    }

    #[tokio::test]
    async fn pull_diff_with_matching_hashes_is_empty() {
        let service = service();
        let tree = service.fetch_replica(1).await.unwrap();
        let observations = tree
            .nodes
            .values()
            .map(|n| fscache_rpc_api::PullObservationView {
                uuid: n.uuid.clone(),
                hash: n.merkle_hash.clone(),
            })
            .collect();
        let items = service.pull_diff(1, observations).await.unwrap();
        assert!(items.is_empty());
    }
}
