//! Metrics collection and exposition.
//!
//! # Metrics
//! - `webscaffold_routes_registered_total` (counter): routes registered, by method
//! - `webscaffold_dispatch_total` (counter): dispatched requests, by target and status
//! - `webscaffold_dispatch_duration_seconds` (histogram): controller action latency
//!
//! # Design Decisions
//! - Exporter is only installed when enabled in config
//! - Targets (`Controller@action`) are bounded by the route table, so label
//!   cardinality stays small

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Count one registered route.
pub fn record_route_registered(method: &str) {
    counter!("webscaffold_routes_registered_total", "method" => method.to_string()).increment(1);
}

/// Count one dispatched request and record its latency.
pub fn record_dispatch(target: &str, status: u16, start: Instant) {
    counter!(
        "webscaffold_dispatch_total",
        "target" => target.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("webscaffold_dispatch_duration_seconds", "target" => target.to_string())
        .record(start.elapsed().as_secs_f64());
}
