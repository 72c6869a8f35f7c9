// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::Parser;
use fscache_config::{DatabaseDriver, FsCacheConfig, FsCacheOpt};
use fscache_db::{DbLoader, DbPool};
use fscache_rpc_server::{spawn_gauge_sampler, RpcService, ServiceMetrics};
use fscache_store::{spawn_eviction_loop, Registry};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

#[cfg(not(target_env = "msvc"))]
mod allocator {
    use tikv_jemallocator::Jemalloc;

    pub type Allocator = Jemalloc;

    pub const fn allocator() -> Allocator {
        Jemalloc
    }
}

#[cfg(target_env = "msvc")]
mod allocator {
    use mimalloc::MiMalloc;

    pub type Allocator = MiMalloc;

    pub const fn allocator() -> Allocator {
        MiMalloc
    }
}

#[global_allocator]
static GLOBAL: allocator::Allocator = allocator::allocator();

/// fscached: a server-side cache and differential-sync engine for per-user
/// filesystem trees, exposed over JSON-RPC.
#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt::try_init();

    let opt = FsCacheOpt::parse();
    if let Err(e) = run(opt).await {
        tracing::error!("{e:?}");
        std::process::exit(1);
    }
}

async fn run(opt: FsCacheOpt) -> Result<()> {
    let config = FsCacheConfig::load(&opt.config)?;

    let pool = match config.database.driver {
        DatabaseDriver::Sqlite3 => {
            let sqlite3 = config
                .database
                .sqlite3
                .as_ref()
                .expect("validated: sqlite3 section present when driver is sqlite3");
            DbPool::sqlite(&sqlite3.path)?
        }
        DatabaseDriver::Mysql => {
            let mysql = config
                .database
                .mysql
                .as_ref()
                .expect("validated: mysql section present when driver is mysql");
            DbPool::mysql(&mysql.connection_url())?
        }
    };
    let loader = Arc::new(DbLoader::new(pool));

    let memory_threshold_bytes = config
        .server
        .memory_threshold_bytes
        .unwrap_or(fscache_store::DEFAULT_MEMORY_THRESHOLD_BYTES);
    let registry = Arc::new(Registry::with_memory_threshold(loader, memory_threshold_bytes));
    let eviction_handle = spawn_eviction_loop(registry.clone(), Duration::from_secs(60));

    let prometheus_registry = prometheus::Registry::new();
    let metrics = Arc::new(ServiceMetrics::new(&prometheus_registry));
    let gauge_sampler_handle = spawn_gauge_sampler(registry.clone(), metrics.clone(), Duration::from_secs(15));
    let metrics_http_handle = fscache_rpc_server::start_metrics_http(prometheus_registry, 9184);

    let service = RpcService::with_debug(registry, metrics, config.server.debug);
    let rpc_handle = fscache_rpc_server::start_server(config.server.port, service).await?;

    info!(port = config.server.port, "fscached started");
    shutdown_signal().await;
    info!("shutdown signal received, stopping");

    rpc_handle.stop();
    eviction_handle.abort();
    gauge_sampler_handle.abort();
    metrics_http_handle.abort();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
