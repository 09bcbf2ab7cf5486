//! Engine limits and commit retry settings.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::resilience::RetryPolicy;

/// Core engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Cash credited to every newly opened account.
    #[serde(default = "default_opening_balance")]
    pub opening_balance: Decimal,
    /// Largest quantity a single order may carry.
    #[serde(default = "default_max_order_quantity")]
    pub max_order_quantity: u32,
    /// Largest page size for paginated order listings.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    /// Retry of transient commit failures.
    #[serde(default)]
    pub commit_retry: CommitRetryConfig,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            opening_balance: default_opening_balance(),
            max_order_quantity: default_max_order_quantity(),
            max_page_size: default_max_page_size(),
            commit_retry: CommitRetryConfig::default(),
        }
    }
}

/// Commit retry settings, in configuration units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRetryConfig {
    /// Total attempts including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Backoff before the first retry.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Upper bound for any backoff.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// Growth factor between retries.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Random spread as a fraction of the backoff.
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,
}

impl Default for CommitRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter_factor: default_jitter_factor(),
        }
    }
}

impl CommitRetryConfig {
    /// Convert to a runtime retry policy.
    #[must_use]
    pub const fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.initial_backoff_ms),
            Duration::from_millis(self.max_backoff_ms),
            self.backoff_multiplier,
            self.jitter_factor,
        )
    }
}

fn default_opening_balance() -> Decimal {
    Decimal::new(100_000, 0)
}

const fn default_max_order_quantity() -> u32 {
    10_000
}

const fn default_max_page_size() -> usize {
    100
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    10
}

const fn default_max_backoff_ms() -> u64 {
    200
}

const fn default_backoff_multiplier() -> f64 {
    2.0
}

const fn default_jitter_factor() -> f64 {
    0.2
}
