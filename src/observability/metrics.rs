//! Metrics collection and exposition.
//!
//! # Metrics
//! - `pathmux_requests_total` (counter): requests by method, status
//! - `pathmux_request_duration_seconds` (histogram): latency by method
//! - `pathmux_unmatched_total` (counter): requests no route matched
//!
//! # Design Decisions
//! - Low-overhead metric updates; a no-op until a recorder is installed
//! - Prometheus exporter only runs when enabled in config

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "pathmux_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("pathmux_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a request that no route matched.
pub fn record_unmatched(served_asset: bool) {
    metrics::counter!(
        "pathmux_unmatched_total",
        "fallback" => if served_asset { "assets" } else { "none" }
    )
    .increment(1);
}
