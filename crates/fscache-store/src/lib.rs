// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

//! The in-memory, multi-tenant Merkle-tree cache: the tenant registry, its
//! two-level locking discipline, the mutation and diff APIs, the eviction
//! loop, the admission guard, and debug-only diagnostics.

pub mod admission;
pub mod debug;
pub mod diff;
pub mod eviction;
pub mod loader;
pub mod mutation;
pub mod registry;
pub mod tenant;

pub use admission::{check_memory_usage, DEFAULT_MEMORY_THRESHOLD_BYTES};
pub use diff::{pull_diff, PullObservation, PushItem};
pub use eviction::spawn_eviction_loop;
pub use loader::Loader;
pub use mutation::{create_entry, remove_entry};
pub use registry::{Registry, DEFAULT_READ_TTL, DEFAULT_SYNC_TTL};
pub use tenant::Tenant;
