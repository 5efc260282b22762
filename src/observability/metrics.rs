//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): gated requests by outcome
//! - `gateway_fallbacks_total` (counter): mock substitutions by operation, reason
//! - `gateway_backend_available` (gauge): 1=closed circuit, 0=open
//! - `gateway_provider_attempts_total` (counter): cascade attempts by provider, outcome
//! - `gateway_unavailable_flag` (gauge): 1 while the cooldown flag is set

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(outcome: &'static str) {
    counter!("gateway_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_fallback(operation: &'static str, reason: &'static str) {
    counter!("gateway_fallbacks_total", "operation" => operation, "reason" => reason).increment(1);
}

pub fn record_backend_available(available: bool) {
    gauge!("gateway_backend_available").set(if available { 1.0 } else { 0.0 });
}

pub fn record_provider_attempt(provider: &str, outcome: &'static str) {
    counter!(
        "gateway_provider_attempts_total",
        "provider" => provider.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_unavailable_flag(set: bool) {
    gauge!("gateway_unavailable_flag").set(if set { 1.0 } else { 0.0 });
}
