//! Metrics collection and exposition.
//!
//! # Metrics
//! - `auth_routes_registered_total` (counter): routes handed to the host, by kind
//! - `auth_redirect_rejected_total` (counter): redirect targets replaced by the
//!   fallback, by failing check
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exposition is optional and owned by the binary

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_route_registered(kind: &'static str) {
    metrics::counter!("auth_routes_registered_total", "kind" => kind).increment(1);
}

pub fn record_redirect_rejected(reason: &'static str) {
    metrics::counter!("auth_redirect_rejected_total", "reason" => reason).increment(1);
}
