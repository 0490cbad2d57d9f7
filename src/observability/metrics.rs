//! Metrics collection and exposition.
//!
//! # Metrics
//! - `transfer_requests_total` (counter): transfers by network, outcome
//! - `transfer_duration_seconds` (histogram): end-to-end transfer latency
//! - `node_requests_total` (counter): node RPC calls by operation, outcome
//! - `broadcasts_total` (counter): submissions by outcome
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Duration;

use ::metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Serve Prometheus metrics on `addr`. Needs a running Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

fn outcome(ok: bool) -> &'static str {
    if ok {
        "success"
    } else {
        "failure"
    }
}

pub fn record_transfer(network: &str, outcome: &'static str, elapsed: Duration) {
    counter!(
        "transfer_requests_total",
        "network" => network.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("transfer_duration_seconds", "network" => network.to_string()).record(elapsed.as_secs_f64());
}

pub fn record_node_call(operation: &'static str, ok: bool) {
    counter!("node_requests_total", "operation" => operation, "outcome" => outcome(ok)).increment(1);
}

pub fn record_broadcast(ok: bool) {
    counter!("broadcasts_total", "outcome" => outcome(ok)).increment(1);
}
