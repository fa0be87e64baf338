//! Metrics collection and exposition.
//!
//! # Metrics
//! - `request_logger_records_total` (counter): captured requests by status
//! - `request_logger_write_failures_total` (counter): appends that failed
//! - `request_logger_rotations_total` (counter): rotations by outcome
//! - `request_logger_active_lines` (gauge): cached line count of the active file
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_captured(status: u16) {
    counter!("request_logger_records_total", "status" => status.to_string()).increment(1);
}

pub fn record_write_failure() {
    counter!("request_logger_write_failures_total").increment(1);
}

pub fn record_rotation(outcome: &'static str) {
    counter!("request_logger_rotations_total", "outcome" => outcome).increment(1);
}

pub fn set_active_lines(lines: usize) {
    gauge!("request_logger_active_lines").set(lines as f64);
}
