// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use crate::views::{PullObservationView, PushItemView, TreeView};
use crate::RpcResult;
use fscache_types::{FsEntry, UserId};
use jsonrpsee::proc_macros::rpc;

/// The four unary operations the cache serves, per §6. `fetch_replica` and
/// `pull_diff` are read-only and lazily materialize an absent tenant;
/// `new_fs_entry` and `remove_fs_entry` presuppose a tenant already cached
/// by a prior read from the same caller.
#[rpc(server, client, namespace = "fscache")]
pub trait FsCacheRpc {
    #[method(name = "fetchReplica")]
    async fn fetch_replica(&self, user_id: UserId) -> RpcResult<TreeView>;

    #[method(name = "pullDiff")]
    async fn pull_diff(&self, user_id: UserId, observations: Vec<PullObservationView>) -> RpcResult<Vec<PushItemView>>;

    #[method(name = "newFsEntry")]
    async fn new_fs_entry(&self, user_id: UserId, fs_entry: FsEntry) -> RpcResult<()>;

    #[method(name = "removeFsEntry")]
    async fn remove_fs_entry(&self, user_id: UserId, uuid: String) -> RpcResult<()>;

    #[method(name = "purgeReplica")]
    async fn purge_replica(&self, user_id: UserId) -> RpcResult<()>;
}
