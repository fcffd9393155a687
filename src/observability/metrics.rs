//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, target
//! - `proxy_request_duration_seconds` (histogram): time to response headers
//! - `proxy_upstream_errors_total` (counter): forwarding failures by target, kind
//!
//! Recording is a no-op until an exporter is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::upstream::ForwardError;

/// Serve Prometheus metrics on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, target: &str, start: Instant) {
    metrics::counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "target" => target.to_string()
    )
    .increment(1);
    metrics::histogram!("proxy_request_duration_seconds", "target" => target.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a forwarding failure.
pub fn record_upstream_error(target: &str, error: &ForwardError) {
    let kind = match error {
        ForwardError::UpstreamUnavailable { .. } => "unavailable",
        ForwardError::UpstreamTimeout { .. } => "timeout",
        ForwardError::InvalidRequest { .. } => "invalid_request",
    };
    metrics::counter!(
        "proxy_upstream_errors_total",
        "target" => target.to_string(),
        "kind" => kind
    )
    .increment(1);
}
