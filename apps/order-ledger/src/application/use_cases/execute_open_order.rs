//! Execute Open Order Use Case

use std::sync::Arc;
use std::time::Instant;

use crate::application::dto::OrderView;
use crate::application::ports::{LedgerChangeSet, LedgerStore, NotificationPort, OrderWrite};
use crate::application::services::{AccountLocks, LedgerCommitter};
use crate::application::use_cases::support::{load_account, load_owned_order, publish_committed};
use crate::domain::order_execution::{OrderStatus, Settlement, TransactionType};
use crate::domain::portfolio::Position;
use crate::domain::shared::{AccountId, Money, OrderId};
use crate::error::{EngineError, ErrorCode};
use crate::resilience::RetryPolicy;

/// Use case for executing an OPEN order at a supplied price.
///
/// The reservation is released and the order settled in one commit. When
/// settlement is refused the reservation is still released and the order is
/// REJECTED. No trigger or matching logic runs here.
pub struct ExecuteOpenOrderUseCase<S, N>
where
    S: LedgerStore,
    N: NotificationPort,
{
    store: Arc<S>,
    notifier: Arc<N>,
    locks: Arc<AccountLocks>,
    committer: LedgerCommitter<S>,
}

impl<S, N> ExecuteOpenOrderUseCase<S, N>
where
    S: LedgerStore,
    N: NotificationPort,
{
    /// Create a new ExecuteOpenOrderUseCase.
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
    /// - `VALIDATION_ERROR` for a price below 0.01
    /// - `NOT_FOUND` / `ACCESS_DENIED` for unknown or foreign orders
    /// - `ILLEGAL_STATE_TRANSITION` unless the order is OPEN
    /// - `INTERNAL_FAILURE` when the result cannot be committed; the order
    ///   stays OPEN with its reservation
    pub async fn execute(
        &self,
        order_id: &OrderId,
        account_id: &AccountId,
        execution_price: Money,
    ) -> Result<OrderView, EngineError> {
        let started = Instant::now();
        execution_price.validate_as_price("execution_price")?;

        let _guard = self.locks.acquire(account_id).await;

        let mut order = load_owned_order(&*self.store, order_id, account_id).await?;
        if order.status() != OrderStatus::Open {
            return Err(EngineError::new(
                ErrorCode::IllegalStateTransition,
                format!(
                    "Order {order_id} is {}; only OPEN orders can be executed",
                    order.status()
                ),
            )
            .with_context("order_id", order_id.as_str()));
        }

        let mut account = load_account(&*self.store, account_id).await?;
        let mut position = self
            .store
            .find_position(account_id, order.symbol())
            .await?
            .unwrap_or_else(|| Position::open(account_id.clone(), order.symbol().clone()));

        match order.transaction_type() {
            TransactionType::Buy => account.release(order.reserved_funds())?,
            TransactionType::Sell => position.release_quantity(order.reserved_shares()),
        }

        let changes = match Settlement::execute(&mut order, &account, &position, execution_price) {
            Ok(settled) => LedgerChangeSet::order_only(OrderWrite::Update(order.clone()))
                .with_account(settled.account)
                .with_position(settled.position)
                .with_trade(settled.trade),
            Err(e) => {
                order.reject(e.reject_reason())?;
                let changes = LedgerChangeSet::order_only(OrderWrite::Update(order.clone()))
                    .with_account(account);
                match order.transaction_type() {
                    TransactionType::Buy => changes,
                    TransactionType::Sell => changes.with_position(position),
                }
            }
        };
        let events = order.drain_events();

        self.committer.commit(&changes).await?;
        tracing::info!(
            order_id = %order_id,
            account_id = %account_id,
            status = %order.status(),
            price = %execution_price,
            "Open order executed"
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
    use crate::domain::order_execution::{
        Order, OrderRepository, OrderType, PlaceOrderCommand, TradeRepository, Validity,
    };
    use crate::domain::portfolio::PositionRepository;
    use crate::domain::shared::{Quantity, Symbol};
    use crate::infrastructure::persistence::InMemoryLedgerStore;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn acct() -> AccountId {
        AccountId::new("acct-1")
    }

    fn use_case(store: &Arc<InMemoryLedgerStore>) -> ExecuteOpenOrderUseCase<InMemoryLedgerStore, NoOpNotifier> {
        ExecuteOpenOrderUseCase::new(
            Arc::clone(store),
            Arc::new(NoOpNotifier),
            Arc::new(AccountLocks::new()),
            RetryPolicy::no_retry(),
        )
    }

    fn open_order(id: &str, side: TransactionType, order_type: OrderType, qty: u32) -> Order {
        let mut order = Order::new(
            OrderId::new(id),
            acct(),
            PlaceOrderCommand {
                symbol: Symbol::new("INFY"),
                transaction_type: side,
                order_type,
                quantity: Quantity::new(qty),
                price: Some(Money::new(dec!(100))),
                trigger_price: Some(Money::new(dec!(101))),
                validity: Validity::Day,
                disclosed_quantity: None,
                notes: None,
            },
        );
        order.open().unwrap();
        order.drain_events();
        order
    }

    #[tokio::test]
    async fn open_buy_executes_at_supplied_price() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let mut account = Account::open(acct(), Money::new(dec!(5000))).unwrap();
        let order = open_order("ORD-1", TransactionType::Buy, OrderType::Sl, 10);
        account.reserve(order.reserved_funds()).unwrap();
        store.seed(&LedgerChangeSet::order_only(OrderWrite::Insert(order)).with_account(account));

        let view = use_case(&store)
            .execute(&OrderId::new("ORD-1"), &acct(), Money::new(dec!(98)))
            .await
            .unwrap();

        assert_eq!(view.status, OrderStatus::Complete);
        let account = store.find_account(&acct()).await.unwrap().unwrap();
        assert_eq!(account.used_margin(), Money::ZERO);
        assert_eq!(account.available_balance(), Money::new(dec!(4020)));
        let position = store.find_position(&acct(), &Symbol::new("INFY")).await.unwrap().unwrap();
        assert_eq!(position.average_cost(), Money::new(dec!(98)));
        assert_eq!(store.find_trades(&acct()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unaffordable_execution_releases_and_rejects() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let mut account = Account::open(acct(), Money::new(dec!(1000))).unwrap();
        let order = open_order("ORD-2", TransactionType::Buy, OrderType::Limit, 10);
        account.reserve(order.reserved_funds()).unwrap();
        store.seed(&LedgerChangeSet::order_only(OrderWrite::Insert(order)).with_account(account));

        let view = use_case(&store)
            .execute(&OrderId::new("ORD-2"), &acct(), Money::new(dec!(150)))
            .await
            .unwrap();

        assert_eq!(view.status, OrderStatus::Rejected);
        assert_eq!(view.rejection_reason.unwrap().code, "INSUFFICIENT_FUNDS");
        let account = store.find_account(&acct()).await.unwrap().unwrap();
        assert_eq!(account.used_margin(), Money::ZERO);
        assert_eq!(account.available_balance(), Money::new(dec!(1000)));
        assert!(store.find_trades(&acct()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn open_sell_releases_shares_then_sells() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let account = Account::open(acct(), Money::new(dec!(0))).unwrap();
        let mut position = Position::open(acct(), Symbol::new("INFY"));
        position.apply_buy(Quantity::new(10), Money::new(dec!(100))).unwrap();
        let order = open_order("ORD-3", TransactionType::Sell, OrderType::Limit, 10);
        position.reserve_quantity(order.reserved_shares()).unwrap();
        store.seed(
            &LedgerChangeSet::order_only(OrderWrite::Insert(order))
                .with_account(account)
                .with_position(position),
        );

        use_case(&store)
            .execute(&OrderId::new("ORD-3"), &acct(), Money::new(dec!(110)))
            .await
            .unwrap();

        let position = store.find_position(&acct(), &Symbol::new("INFY")).await.unwrap().unwrap();
        assert_eq!(position.quantity(), Quantity::ZERO);
        assert_eq!(position.reserved_quantity(), Quantity::ZERO);
        assert_eq!(position.realized_pnl(), Money::new(dec!(100)));
        let account = store.find_account(&acct()).await.unwrap().unwrap();
        assert_eq!(account.available_balance(), Money::new(dec!(1100)));
    }

    #[tokio::test]
    async fn only_open_orders_execute() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let account = Account::open(acct(), Money::new(dec!(1000))).unwrap();
        let mut pending = Order::new(
            OrderId::new("ORD-4"),
            acct(),
            PlaceOrderCommand {
                symbol: Symbol::new("INFY"),
                transaction_type: TransactionType::Buy,
                order_type: OrderType::Market,
                quantity: Quantity::new(1),
                price: None,
                trigger_price: None,
                validity: Validity::Day,
                disclosed_quantity: None,
                notes: None,
            },
        );
        pending.drain_events();
        store.seed(&LedgerChangeSet::order_only(OrderWrite::Insert(pending)).with_account(account));

        let err = use_case(&store)
            .execute(&OrderId::new("ORD-4"), &acct(), Money::new(dec!(10)))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::IllegalStateTransition);

        let stored = store.find_order(&OrderId::new("ORD-4")).await.unwrap().unwrap();
        assert_eq!(stored.status(), OrderStatus::Pending);
    }

    #[test_case(dec!(0.001) ; "below the tick")]
    #[test_case(rust_decimal::Decimal::MAX ; "above the ceiling")]
    #[tokio::test]
    async fn out_of_range_price_is_a_validation_error(price: rust_decimal::Decimal) {
        let store = Arc::new(InMemoryLedgerStore::new());

        let err = use_case(&store)
            .execute(&OrderId::new("ORD-5"), &acct(), Money::new(price))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(err.violations()[0].field, "execution_price");
    }
}
