//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): requests by outcome
//!   (`handled`, `suspended`, `not_found`)
//! - `router_routes_registered_total` (counter): registrations by method
//! - `router_request_duration_seconds` (histogram): time spent in the router,
//!   handler included

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::DispatchOutcome;

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_dispatch(outcome: DispatchOutcome) {
    metrics::counter!("router_dispatch_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_route_registered(method: &str) {
    metrics::counter!("router_routes_registered_total", "method" => method.to_string()).increment(1);
}

pub fn record_duration(method: &str, outcome: DispatchOutcome, start: Instant) {
    metrics::histogram!(
        "router_request_duration_seconds",
        "method" => method.to_string(),
        "outcome" => outcome.as_str()
    )
    .record(start.elapsed().as_secs_f64());
}
