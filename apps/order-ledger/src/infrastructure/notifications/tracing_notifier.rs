//! Notifier that writes order events to the tracing log as JSON.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::application::ports::{NotificationError, NotificationPort};
use crate::domain::order_execution::events::OrderEvent;

/// Publishes each order event as one structured `info` record.
#[derive(Debug, Default)]
pub struct TracingNotifier {
    published: AtomicU64,
}

impl TracingNotifier {
    /// Create a new notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events published since creation.
    #[must_use]
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl NotificationPort for TracingNotifier {
    async fn publish_order_events(&self, events: Vec<OrderEvent>) -> Result<(), NotificationError> {
        for event in events {
            let payload = serde_json::to_string(&event).map_err(|e| {
                NotificationError::SerializationError {
                    message: e.to_string(),
                }
            })?;
            tracing::info!(
                target: "order_ledger::notifications",
                event_type = event.event_type(),
                order_id = %event.order_id(),
                account_id = %event.account_id(),
                payload = %payload,
                "Order event"
            );
            self.published.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }
}
