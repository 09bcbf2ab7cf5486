//! Helpers shared by the use cases.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join_all;

use crate::application::ports::{LedgerStore, NotificationPort};
use crate::application::services::spawn_dispatch;
use crate::domain::instrument::InstrumentRepository;
use crate::domain::ledger::Account;
use crate::domain::order_execution::{Order, OrderEvent};
use crate::domain::shared::{AccountId, Money, OrderId, Symbol};
use crate::error::EngineError;
use crate::observability::{
    record_order_cancelled, record_order_executed, record_order_placed, record_order_rejected,
};

/// Load an account or fail with `NOT_FOUND`.
pub(crate) async fn load_account<S: LedgerStore + ?Sized>(
    store: &S,
    account_id: &AccountId,
) -> Result<Account, EngineError> {
    store
        .find_account(account_id)
        .await?
        .ok_or_else(|| EngineError::account_not_found(account_id.as_str()))
}

/// Load an order placed by `account_id`.
///
/// Fails with `NOT_FOUND` for unknown ids and `ACCESS_DENIED` for orders of
/// other accounts.
pub(crate) async fn load_owned_order<S: LedgerStore + ?Sized>(
    store: &S,
    order_id: &OrderId,
    account_id: &AccountId,
) -> Result<Order, EngineError> {
    let order = store
        .find_order(order_id)
        .await?
        .ok_or_else(|| EngineError::order_not_found(order_id.as_str()))?;

    if !order.belongs_to(account_id) {
        tracing::warn!(
            order_id = %order_id,
            account_id = %account_id,
            "Order access by non-owner denied"
        );
        return Err(EngineError::access_denied(order_id.as_str()));
    }
    Ok(order)
}

/// Latest catalog price of every symbol, looked up concurrently.
///
/// Unknown instruments map to `None`.
pub(crate) async fn latest_prices<I: InstrumentRepository + ?Sized>(
    instruments: &I,
    symbols: impl IntoIterator<Item = Symbol>,
) -> Result<HashMap<Symbol, Option<Money>>, EngineError> {
    let lookups = symbols.into_iter().map(|symbol| async move {
        let price = instruments
            .find_instrument(&symbol)
            .await?
            .and_then(|instrument| instrument.current_price());
        Ok::<_, EngineError>((symbol, price))
    });

    Ok(try_join_all(lookups).await?.into_iter().collect())
}

/// Record metrics for committed events, then hand them to the notifier on a
/// background task.
pub(crate) fn publish_committed<N: NotificationPort + ?Sized>(
    notifier: &Arc<N>,
    order: &Order,
    events: Vec<OrderEvent>,
    started: Instant,
) {
    let order_type = order.order_type().as_str();
    let side = order.transaction_type().as_str();

    for event in &events {
        match event {
            OrderEvent::Placed(_) => record_order_placed(order_type, side),
            OrderEvent::Executed(_) => {
                record_order_executed(order_type, side, started.elapsed().as_secs_f64());
            }
            OrderEvent::Cancelled(_) => record_order_cancelled(),
            OrderEvent::Rejected(rejected) => record_order_rejected(&rejected.reason.code),
        }
    }

    spawn_dispatch(notifier, events);
}
