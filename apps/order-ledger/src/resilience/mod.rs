//! Resilience patterns for persistence calls.
//!
//! Bounded retry with exponential backoff and jitter.

mod retry;

pub use retry::{ExponentialBackoffCalculator, RetryPolicy};
