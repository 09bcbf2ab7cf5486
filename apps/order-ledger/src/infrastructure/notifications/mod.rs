//! Notification Adapters
//!
//! Implementations of the notification port.

mod tracing_notifier;

pub use tracing_notifier::TracingNotifier;
