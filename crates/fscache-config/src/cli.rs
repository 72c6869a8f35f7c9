// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use std::path::PathBuf;

/// fscached: a server-side cache and differential-sync engine for per-user
/// filesystem trees.
#[derive(Clone, Debug, Parser)]
#[command(name = "fscached")]
pub struct FsCacheOpt {
    /// Path to the YAML configuration file.
    #[clap(long = "config", default_value = "./config.yaml")]
    pub config: PathBuf,
}
