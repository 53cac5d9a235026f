//! Metrics collection and exposition.
//!
//! # Metrics
//! - `xeno_proxy_cache_lookups_total` (counter): lookups by outcome (hit/miss)
//! - `xeno_proxy_cache_entries` (gauge): number of cached terms
//! - `xeno_proxy_upstream_requests_total` (counter): upstream calls by status
//! - `xeno_proxy_upstream_duration_seconds` (histogram): upstream latency
//!
//! Recording is a no-op until a recorder is installed, so the lookup path
//! calls these unconditionally.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count a cache lookup.
pub fn record_cache_lookup(outcome: &'static str) {
    counter!("xeno_proxy_cache_lookups_total", "outcome" => outcome).increment(1);
}

/// Report the current number of cached terms.
pub fn record_cache_size(entries: usize) {
    gauge!("xeno_proxy_cache_entries").set(entries as f64);
}

/// Record one upstream call. `None` means the call never got a status.
pub fn record_upstream(status: Option<u16>, start_time: Instant) {
    let status = status.map_or_else(|| "error".to_string(), |s| s.to_string());
    counter!("xeno_proxy_upstream_requests_total", "status" => status).increment(1);
    histogram!("xeno_proxy_upstream_duration_seconds").record(start_time.elapsed().as_secs_f64());
}
