// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use fscache_types::{CacheResult, Tree, UserId};

/// Materializes a fresh tree for a user from whatever external source of
/// record backs the cache. Implemented by `fscache-db`; kept as a trait here
/// so the registry has no compile-time dependency on a particular database
/// backend.
pub trait Loader: Send + Sync {
    fn load(&self, user_id: UserId) -> CacheResult<Tree>;
}
