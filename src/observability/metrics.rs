//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): dispatched requests by verb, route, outcome
//! - `gateway_request_duration_seconds` (histogram): dispatch latency by verb, outcome
//! - `gateway_routes_bound` (gauge): bindings in the active route table
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::dispatch::DispatchOutcome;
use crate::http::method::Verb;

/// Install the Prometheus exporter and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record the outcome of one dispatch.
pub fn record_dispatch(verb: Verb, route: &str, outcome: DispatchOutcome, start: Instant) {
    counter!(
        "gateway_requests_total",
        "verb" => verb.as_str(),
        "route" => route.to_string(),
        "outcome" => outcome.as_str(),
    )
    .increment(1);

    histogram!(
        "gateway_request_duration_seconds",
        "verb" => verb.as_str(),
        "outcome" => outcome.as_str(),
    )
    .record(start.elapsed().as_secs_f64());
}

/// Publish the number of bound routes.
pub fn set_routes_bound(count: usize) {
    gauge!("gateway_routes_bound").set(count as f64);
}
