//! Observability module for metrics and logging.
//!
//! Prometheus metrics export and `tracing-subscriber` setup.

mod logging;
mod metrics;

pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_commit_failure, record_commit_retry,
    record_order_cancelled, record_order_executed, record_order_placed, record_order_rejected,
};
pub use logging::{TracingError, env_filter, init_tracing};
