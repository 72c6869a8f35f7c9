// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

//! The source-of-record loader: a diesel-backed query against the
//! relational schema the cache is materialized from, and the metadata
//! builder that reproduces the original service's synthesized fields.

pub mod loader;
pub mod metadata;
pub mod pool;
pub mod row;

pub use loader::DbLoader;
pub use pool::DbPool;
pub use row::FsEntryRow;
