//! Notification Port (Driven Port)
//!
//! Fire-and-forget delivery of order lifecycle events.

use async_trait::async_trait;

use crate::domain::order_execution::events::OrderEvent;

/// Notification delivery error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NotificationError {
    /// Dispatcher unreachable.
    #[error("Notification dispatcher unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },

    /// Event could not be encoded.
    #[error("Event serialization error: {message}")]
    SerializationError {
        /// Error message.
        message: String,
    },
}

/// Port for dispatching order events after they are committed.
///
/// Failures are reported to the caller but never undo the order.
#[async_trait]
pub trait NotificationPort: Send + Sync + 'static {
    /// Publish order events in the order they occurred.
    async fn publish_order_events(&self, events: Vec<OrderEvent>) -> Result<(), NotificationError>;

    /// Publish a single order event.
    async fn publish_order_event(&self, event: OrderEvent) -> Result<(), NotificationError> {
        self.publish_order_events(vec![event]).await
    }
}

/// No-op notifier for testing.
#[derive(Debug, Clone, Default)]
pub struct NoOpNotifier;

#[async_trait]
impl NotificationPort for NoOpNotifier {
    async fn publish_order_events(
        &self,
        _events: Vec<OrderEvent>,
    ) -> Result<(), NotificationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_execution::events::OrderCancelled;
    use crate::domain::order_execution::value_objects::CancelReason;
    use crate::domain::shared::{AccountId, OrderId, Timestamp};

    #[tokio::test]
    async fn no_op_notifier_succeeds() {
        let notifier = NoOpNotifier;

        let event = OrderEvent::Cancelled(OrderCancelled {
            order_id: OrderId::new("ORD-1"),
            account_id: AccountId::new("acct-1"),
            reason: CancelReason::user_requested(),
            occurred_at: Timestamp::now(),
        });

        assert!(notifier.publish_order_event(event).await.is_ok());
    }
}
