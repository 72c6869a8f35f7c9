// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use prometheus::{register_int_counter_vec_with_registry, register_int_gauge_with_registry, IntCounterVec, IntGauge, Registry};

/// Per-method call counters plus the two cache-occupancy gauges named in
/// §4.11: `active_tenants` and `nodes_cached`. Updated from the RPC
/// service layer (call counters) and a periodic sampler over the registry
/// (the gauges) -- see `crate::spawn_gauge_sampler`.
pub struct ServiceMetrics {
    calls_total: IntCounterVec,
    call_errors_total: IntCounterVec,
    active_tenants: IntGauge,
    nodes_cached: IntGauge,
}

impl ServiceMetrics {
    pub fn new(registry: &Registry) -> Self {
        Self {
            calls_total: register_int_counter_vec_with_registry!(
                "fscache_rpc_calls_total",
                "Number of RPC calls received, labeled by method.",
                &["method"],
                registry,
            )
            .unwrap(),
            call_errors_total: register_int_counter_vec_with_registry!(
                "fscache_rpc_call_errors_total",
                "Number of RPC calls that returned an error, labeled by method.",
                &["method"],
                registry,
            )
            .unwrap(),
            active_tenants: register_int_gauge_with_registry!(
                "fscache_active_tenants",
                "Number of tenants currently cached in the registry.",
                registry,
            )
            .unwrap(),
            nodes_cached: register_int_gauge_with_registry!(
                "fscache_nodes_cached",
                "Total number of nodes across all cached tenants.",
                registry,
            )
            .unwrap(),
        }
    }

    pub fn record_success(&self, method: &str) {
        self.calls_total.with_label_values(&[method]).inc();
    }

    pub fn record_failure(&self, method: &str) {
        self.calls_total.with_label_values(&[method]).inc();
        self.call_errors_total.with_label_values(&[method]).inc();
    }

    pub fn set_active_tenants(&self, count: i64) {
        self.active_tenants.set(count);
    }

    pub fn set_nodes_cached(&self, count: i64) {
        self.nodes_cached.set(count);
    }

    #[cfg(test)]
    pub(crate) fn active_tenants_for_test(&self) -> i64 {
        self.active_tenants.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_increments_calls_only() {
        let registry = Registry::new();
        let metrics = ServiceMetrics::new(&registry);
        metrics.record_success("fetch_replica");
        assert_eq!(metrics.calls_total.with_label_values(&["fetch_replica"]).get(), 1);
        assert_eq!(metrics.call_errors_total.with_label_values(&["fetch_replica"]).get(), 0);
    }

    #[test]
    fn failure_increments_both_counters() {
        let registry = Registry::new();
        let metrics = ServiceMetrics::new(&registry);
        metrics.record_failure("remove_fs_entry");
        assert_eq!(metrics.calls_total.with_label_values(&["remove_fs_entry"]).get(), 1);
        assert_eq!(metrics.call_errors_total.with_label_values(&["remove_fs_entry"]).get(), 1);
    }

    #[test]
    fn gauges_reflect_latest_set_call() {
        let registry = Registry::new();
        let metrics = ServiceMetrics::new(&registry);
        metrics.set_active_tenants(3);
        metrics.set_nodes_cached(42);
        assert_eq!(metrics.active_tenants.get(), 3);
        assert_eq!(metrics.nodes_cached.get(), 42);
    }
}
