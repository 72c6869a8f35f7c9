// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

//! Bootstraps the JSON-RPC transport and the Prometheus `/metrics` endpoint
//! around an `fscache_store::Registry`: `start_server` starts the former,
//! `start_metrics_http` the latter, and `spawn_gauge_sampler` keeps the
//! registry-derived gauges fresh between RPC calls.

pub mod metrics;
pub mod service;

pub use metrics::ServiceMetrics;
pub use service::RpcService;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use fscache_rpc_api::FsCacheRpcServer;
use fscache_store::Registry;
use jsonrpsee::server::ServerBuilder;
use prometheus::{Registry as PrometheusRegistry, TextEncoder};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Handle to the running JSON-RPC server. Dropping it without calling
/// `stop` leaves the server running; `stop` is the graceful path used on
/// shutdown.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: broadcast::Sender<()>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Starts the `fscache` namespace JSON-RPC server on `port`. Binds
/// `0.0.0.0:<port>`; pass `0` to let the OS choose a free port, which is
/// what the test suite and `local_addr()` rely on.
pub async fn start_server(port: u16, service: RpcService) -> Result<ServerHandle> {
    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    let middleware = ServiceBuilder::new().layer(TraceLayer::new_for_http());

    let server = ServerBuilder::default().set_http_middleware(middleware).build(addr).await?;
    let local_addr = server.local_addr()?;

    let (shutdown_tx, _) = broadcast::channel(1);
    let mut shutdown_rx = shutdown_tx.subscribe();

    let handle = server.start(service.into_rpc());
    tokio::spawn(async move {
        let _ = shutdown_rx.recv().await;
        let _ = handle.stop();
    });

    info!(%local_addr, "fscache JSON-RPC server listening");
    Ok(ServerHandle { local_addr, shutdown_tx })
}

/// Periodically copies `registry`'s occupancy into the gauges `metrics`
/// exposes, so `/metrics` reflects current state even between RPC calls.
pub fn spawn_gauge_sampler(registry: Arc<Registry>, metrics: Arc<ServiceMetrics>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            metrics.set_active_tenants(registry.tenant_count() as i64);
            metrics.set_nodes_cached(registry.total_nodes_cached() as i64);
        }
    })
}

const METRICS_ROUTE: &str = "/metrics";

/// Starts the Prometheus scrape endpoint on `port`, mirroring the
/// `encode_to_string`-over-`TextEncoder` pattern the workspace's own
/// metrics server uses.
pub fn start_metrics_http(registry: PrometheusRegistry, port: u16) -> JoinHandle<Result<()>> {
    let app = Router::new().route(METRICS_ROUTE, get(serve_metrics)).with_state(registry);

    tokio::spawn(async move {
        let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, "metrics server listening");
        axum::serve(listener, app).await?;
        Ok(())
    })
}

async fn serve_metrics(State(registry): State<PrometheusRegistry>) -> (StatusCode, String) {
    let metric_families = registry.gather();
    match TextEncoder.encode_to_string(&metric_families) {
        Ok(body) => (StatusCode::OK, body),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, format!("unable to encode metrics: {err}")),
    }
}
