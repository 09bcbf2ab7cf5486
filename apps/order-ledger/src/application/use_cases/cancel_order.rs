//! Cancel Order Use Case

use std::sync::Arc;
use std::time::Instant;

use crate::application::dto::OrderView;
use crate::application::ports::{LedgerChangeSet, LedgerStore, NotificationPort, OrderWrite};
use crate::application::services::{AccountLocks, LedgerCommitter};
use crate::application::use_cases::support::{load_account, load_owned_order, publish_committed};
use crate::domain::order_execution::{CancelReason, OrderStatus, TransactionType};
use crate::domain::shared::{AccountId, OrderId};
use crate::error::EngineError;
use crate::resilience::RetryPolicy;

/// Use case for cancelling a PENDING or OPEN order.
///
/// An OPEN order gives back exactly what it reserved, recomputed from its
/// stored fields.
pub struct CancelOrderUseCase<S, N>
where
    S: LedgerStore,
    N: NotificationPort,
{
    store: Arc<S>,
    notifier: Arc<N>,
    locks: Arc<AccountLocks>,
    committer: LedgerCommitter<S>,
}

impl<S, N> CancelOrderUseCase<S, N>
where
    S: LedgerStore,
    N: NotificationPort,
{
    /// Create a new CancelOrderUseCase.
    pub fn new(
        store: Arc<S>,
        notifier: Arc<N>,
        locks: Arc<AccountLocks>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            committer: LedgerCommitter::new(Arc::clone(&store), retry_policy),
            store,
            notifier,
            locks,
        }
    }

    /// Execute the use case.
    ///
    /// # Errors
    ///
    /// - `NOT_FOUND` / `ACCESS_DENIED` for unknown or foreign orders
    /// - `ILLEGAL_STATE_TRANSITION` unless the order is PENDING or OPEN
    /// - `INTERNAL_FAILURE` when the cancellation cannot be committed
    pub async fn execute(
        &self,
        order_id: &OrderId,
        account_id: &AccountId,
    ) -> Result<OrderView, EngineError> {
        let started = Instant::now();
        let _guard = self.locks.acquire(account_id).await;

        let mut order = load_owned_order(&*self.store, order_id, account_id).await?;
        let held_reservation = order.status() == OrderStatus::Open;

        order.cancel(CancelReason::user_requested())?;
        let events = order.drain_events();

        let mut changes = LedgerChangeSet::order_only(OrderWrite::Update(order.clone()));
        if held_reservation {
            match order.transaction_type() {
                TransactionType::Buy => {
                    let mut account = load_account(&*self.store, account_id).await?;
                    account.release(order.reserved_funds())?;
                    changes = changes.with_account(account);
                }
                TransactionType::Sell => {
                    if let Some(mut position) =
                        self.store.find_position(account_id, order.symbol()).await?
                    {
                        position.release_quantity(order.reserved_shares());
                        changes = changes.with_position(position);
                    }
                }
            }
        }

        self.committer.commit(&changes).await?;
        tracing::info!(
            order_id = %order_id,
            account_id = %account_id,
            symbol = %order.symbol(),
            released_funds = %order.reserved_funds(),
            released_shares = %order.reserved_shares(),
            "Order cancelled"
        );
        publish_committed(&self.notifier, &order, events, started);

        Ok(OrderView::from_order(&order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::NoOpNotifier;
    use crate::domain::ledger::{Account, AccountRepository};
    use crate::domain::order_execution::{Order, OrderRepository, OrderType, PlaceOrderCommand, Validity};
    use crate::domain::portfolio::{Position, PositionRepository};
    use crate::domain::shared::{Money, Quantity, Symbol, TradeId};
    use crate::error::ErrorCode;
    use crate::infrastructure::persistence::InMemoryLedgerStore;
    use rust_decimal_macros::dec;

    fn use_case(store: &Arc<InMemoryLedgerStore>) -> CancelOrderUseCase<InMemoryLedgerStore, NoOpNotifier> {
        CancelOrderUseCase::new(
            Arc::clone(store),
            Arc::new(NoOpNotifier),
            Arc::new(AccountLocks::new()),
            RetryPolicy::no_retry(),
        )
    }

    fn order(id: &str, side: TransactionType, price: rust_decimal::Decimal, qty: u32) -> Order {
        let mut order = Order::new(
            OrderId::new(id),
            AccountId::new("acct-1"),
            PlaceOrderCommand {
                symbol: Symbol::new("INFY"),
                transaction_type: side,
                order_type: OrderType::Limit,
                quantity: Quantity::new(qty),
                price: Some(Money::new(price)),
                trigger_price: None,
                validity: Validity::Day,
                disclosed_quantity: None,
                notes: None,
            },
        );
        order.drain_events();
        order
    }

    fn seed(store: &InMemoryLedgerStore, account: Account, position: Option<Position>, order: Order) {
        let mut changes = LedgerChangeSet::order_only(OrderWrite::Insert(order)).with_account(account);
        if let Some(position) = position {
            changes = changes.with_position(position);
        }
        store.seed(&changes);
    }

    #[tokio::test]
    async fn cancelling_open_buy_releases_reserved_margin() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let mut account = Account::open(AccountId::new("acct-1"), Money::new(dec!(10000))).unwrap();
        let mut open = order("ORD-1", TransactionType::Buy, dec!(99.99), 7);
        open.open().unwrap();
        account.reserve(open.reserved_funds()).unwrap();
        seed(&store, account, None, open);

        let view = use_case(&store)
            .execute(&OrderId::new("ORD-1"), &AccountId::new("acct-1"))
            .await
            .unwrap();

        assert_eq!(view.status, OrderStatus::Cancelled);
        let account = store.find_account(&AccountId::new("acct-1")).await.unwrap().unwrap();
        assert_eq!(account.used_margin(), Money::ZERO);
        assert_eq!(account.free_margin(), Money::new(dec!(10000)));
    }

    #[tokio::test]
    async fn cancelling_open_sell_releases_reserved_shares() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let account = Account::open(AccountId::new("acct-1"), Money::new(dec!(10000))).unwrap();
        let mut position = Position::open(AccountId::new("acct-1"), Symbol::new("INFY"));
        position.apply_buy(Quantity::new(10), Money::new(dec!(100))).unwrap();
        let mut open = order("ORD-2", TransactionType::Sell, dec!(120), 4);
        open.open().unwrap();
        position.reserve_quantity(open.reserved_shares()).unwrap();
        seed(&store, account, Some(position), open);

        use_case(&store)
            .execute(&OrderId::new("ORD-2"), &AccountId::new("acct-1"))
            .await
            .unwrap();

        let position = store
            .find_position(&AccountId::new("acct-1"), &Symbol::new("INFY"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(position.available_quantity(), Quantity::new(10));
    }

    #[tokio::test]
    async fn cancelling_complete_order_is_illegal_and_changes_nothing() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let account = Account::open(AccountId::new("acct-1"), Money::new(dec!(10000))).unwrap();
        let mut done = order("ORD-3", TransactionType::Buy, dec!(100), 1);
        done.complete(Money::new(dec!(100)), TradeId::new("TXN-1")).unwrap();
        done.drain_events();
        seed(&store, account.clone(), None, done.clone());

        let err = use_case(&store)
            .execute(&OrderId::new("ORD-3"), &AccountId::new("acct-1"))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::IllegalStateTransition);
        let stored = store.find_order(&OrderId::new("ORD-3")).await.unwrap().unwrap();
        assert_eq!(stored, done);
        assert_eq!(
            store.find_account(&AccountId::new("acct-1")).await.unwrap().unwrap(),
            account
        );
    }

    #[tokio::test]
    async fn foreign_order_is_access_denied() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let account = Account::open(AccountId::new("acct-1"), Money::new(dec!(10000))).unwrap();
        seed(&store, account, None, order("ORD-4", TransactionType::Buy, dec!(1), 1));

        let err = use_case(&store)
            .execute(&OrderId::new("ORD-4"), &AccountId::new("intruder"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::AccessDenied);

        let err = use_case(&store)
            .execute(&OrderId::new("ORD-404"), &AccountId::new("acct-1"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
