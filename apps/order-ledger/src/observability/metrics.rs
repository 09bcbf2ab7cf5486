//! Prometheus metrics for the order engine.
//!
//! Recording goes through the `metrics` facade and is a no-op until an
//! exporter is installed with [`init_metrics`].
//!
//! # Example
//!
//! ```ignore
//! use order_ledger::observability::{init_metrics, MetricsConfig};
//!
//! let config = MetricsConfig::default();
//! init_metrics(&config)?;
//!
//! record_order_placed("LIMIT", "BUY");
//! ```

use std::net::{Ipv4Addr, SocketAddr};

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for latency measurements (in seconds).
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 9090)),
            // 100us to 1s
            latency_buckets: vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
            ],
        }
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            ..Default::default()
        }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

// ============================================================================
// Order Lifecycle Metrics
// ============================================================================

/// Record an accepted placement.
pub fn record_order_placed(order_type: &str, side: &str) {
    counter!(
        "orders_placed_total",
        "order_type" => order_type.to_string(),
        "side" => side.to_string()
    )
    .increment(1);
}

/// Record a full execution and how long the placing or executing call took.
pub fn record_order_executed(order_type: &str, side: &str, latency_seconds: f64) {
    counter!(
        "orders_executed_total",
        "order_type" => order_type.to_string(),
        "side" => side.to_string()
    )
    .increment(1);

    histogram!(
        "order_execution_seconds",
        "order_type" => order_type.to_string()
    )
    .record(latency_seconds);
}

/// Record a cancellation.
pub fn record_order_cancelled() {
    counter!("orders_cancelled_total").increment(1);
}

/// Record a rejection.
///
/// # Arguments
///
/// * `reason` - Rejection code (e.g., `"INSUFFICIENT_FUNDS"`)
pub fn record_order_rejected(reason: &str) {
    counter!(
        "orders_rejected_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

// ============================================================================
// Ledger Commit Metrics
// ============================================================================

/// Record a retried commit.
pub fn record_commit_retry() {
    counter!("ledger_commit_retries_total").increment(1);
}

/// Record a commit that failed for good.
pub fn record_commit_failure() {
    counter!("ledger_commit_failures_total").increment(1);
}
