//! Metrics collection and exposition.
//!
//! # Metrics
//! - `iris_requests_total` (counter): requests by method, status
//! - `iris_request_duration_seconds` (histogram): end-to-end latency
//!
//! # Design Decisions
//! - Prometheus exporter runs on its own listener, off the serving port
//! - Updates are atomic increments; safe from concurrent request tasks
//! - Export install failure degrades to no-op recorders, never fatal

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            tracing::info!(address = %addr, "metrics exporter listening");
        }
        Err(error) => {
            tracing::error!(error = %error, "failed to install metrics exporter");
        }
    }
}

/// Record one finished request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("iris_requests_total", &labels).increment(1);
    metrics::histogram!("iris_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}
