// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

//! Process bootstrap inputs for `fscached`: the `--config` CLI flag and the
//! YAML configuration schema it points at.

pub mod cli;
pub mod config;

pub use cli::FsCacheOpt;
pub use config::{DatabaseConfig, DatabaseDriver, FsCacheConfig, MySqlConfig, ServerSettings, Sqlite3Config};
