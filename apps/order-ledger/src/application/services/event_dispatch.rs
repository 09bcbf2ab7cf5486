//! Post-commit event dispatch.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::application::ports::NotificationPort;
use crate::domain::order_execution::OrderEvent;

/// Publish events drained from a committed order.
///
/// Failures are logged and swallowed: the order is already durable.
pub async fn dispatch_events<N: NotificationPort + ?Sized>(notifier: &N, events: Vec<OrderEvent>) {
    let Some(first) = events.first() else {
        return;
    };
    let order_id = first.order_id().clone();
    let count = events.len();

    if let Err(e) = notifier.publish_order_events(events).await {
        tracing::warn!(order_id = %order_id, events = count, error = %e, "Failed to publish order events");
    }
}

/// Publish events on a background task.
///
/// The caller returns without waiting on the notifier, so a stalled
/// dispatcher never holds up an account.
pub fn spawn_dispatch<N: NotificationPort + ?Sized>(
    notifier: &Arc<N>,
    events: Vec<OrderEvent>,
) -> Option<JoinHandle<()>> {
    if events.is_empty() {
        return None;
    }
    let notifier = Arc::clone(notifier);
    Some(tokio::spawn(async move {
        dispatch_events(&*notifier, events).await;
    }))
}
