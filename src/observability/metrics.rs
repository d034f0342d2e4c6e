//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cycler_tx_sent_total` (counter): broadcast transactions by label
//! - `cycler_tx_failed_total` (counter): failed or reverted transactions by label
//! - `cycler_cycles_total` (counter): task cycles by task and outcome
//! - `cycler_last_balance_wei` (gauge): last observed native balance by address

use std::net::SocketAddr;

use alloy::primitives::{Address, U256};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_tx_sent(label: &str) {
    metrics::counter!("cycler_tx_sent_total", "label" => label.to_string()).increment(1);
}

pub fn record_tx_failed(label: &str) {
    metrics::counter!("cycler_tx_failed_total", "label" => label.to_string()).increment(1);
}

/// Count one finished cycle of `task`.
pub fn record_cycle(task: &str, ok: bool) {
    let outcome = if ok { "success" } else { "failure" };
    metrics::counter!(
        "cycler_cycles_total",
        "task" => task.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Last seen balance in wei. Precision above 2^53 is lost.
pub fn record_balance(address: Address, wei: U256) {
    let value: f64 = wei.to_string().parse().unwrap_or(f64::MAX);
    metrics::gauge!("cycler_last_balance_wei", "address" => address.to_string()).set(value);
}
