//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_forward_total` (counter): relay calls by outcome
//! - `relay_forward_duration_seconds` (histogram): end-to-end relay latency
//!
//! Outcome labels are `upstream_json`, `upstream_text`, or the
//! `ForwardError::kind()` of the failure.
//!
//! # Design Decisions
//! - The exporter is optional; without it the macros are no-ops
//! - Failure kinds are recorded here even though callers only see status 500

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished relay call.
pub fn record_forward(outcome: &'static str, start: Instant) {
    ::metrics::counter!("relay_forward_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("relay_forward_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
