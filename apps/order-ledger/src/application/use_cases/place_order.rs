//! Place Order Use Case

use std::sync::Arc;
use std::time::Instant;

use crate::application::dto::OrderView;
use crate::application::ports::{LedgerChangeSet, LedgerStore, NotificationPort, OrderWrite};
use crate::application::services::{AccountLocks, LedgerCommitter};
use crate::application::use_cases::support::{load_account, publish_committed};
use crate::domain::instrument::InstrumentRepository;
use crate::domain::ledger::Account;
use crate::domain::order_execution::{
    ExecutionMode, Order, PlaceOrderCommand, PreTradeApproval, PreTradeCheck, RejectReason,
    Settlement, SettlementError, TransactionType,
};
use crate::domain::portfolio::Position;
use crate::domain::shared::{AccountId, OrderId, Quantity};
use crate::error::EngineError;
use crate::resilience::RetryPolicy;

/// Attempts at drawing an unused order id.
const MAX_ORDER_ID_ATTEMPTS: u32 = 5;

/// Use case for placing an order.
///
/// Validates the request, runs pre-trade checks under the account lock and
/// persists the order PENDING before dispatching it: MARKET orders execute
/// immediately, the rest rest OPEN with their funds or shares reserved.
/// Business-rule failures yield a stored REJECTED order, not an error.
pub struct PlaceOrderUseCase<S, I, N>
where
    S: LedgerStore,
    I: InstrumentRepository,
    N: NotificationPort,
{
    store: Arc<S>,
    instruments: Arc<I>,
    notifier: Arc<N>,
    locks: Arc<AccountLocks>,
    committer: LedgerCommitter<S>,
    max_order_quantity: Quantity,
}

impl<S, I, N> PlaceOrderUseCase<S, I, N>
where
    S: LedgerStore,
    I: InstrumentRepository,
    N: NotificationPort,
{
    /// Create a new PlaceOrderUseCase.
    pub fn new(
        store: Arc<S>,
        instruments: Arc<I>,
        notifier: Arc<N>,
        locks: Arc<AccountLocks>,
        retry_policy: RetryPolicy,
        max_order_quantity: Quantity,
    ) -> Self {
        Self {
            committer: LedgerCommitter::new(Arc::clone(&store), retry_policy),
            store,
            instruments,
            notifier,
            locks,
            max_order_quantity,
        }
    }

    /// Execute the use case.
    ///
    /// # Errors
    ///
    /// - `VALIDATION_ERROR` for a malformed request, listing every bad field
    /// - `NOT_FOUND` for an unknown account or instrument
    /// - `INTERNAL_FAILURE` when the order cannot be persisted; an order
    ///   already stored PENDING stays PENDING
    pub async fn execute(
        &self,
        account_id: &AccountId,
        cmd: PlaceOrderCommand,
    ) -> Result<OrderView, EngineError> {
        let started = Instant::now();
        cmd.validate(self.max_order_quantity)?;

        let _guard = self.locks.acquire(account_id).await;

        let account = load_account(&*self.store, account_id).await?;
        let instrument = self
            .instruments
            .find_instrument(&cmd.symbol)
            .await?
            .ok_or_else(|| EngineError::instrument_not_found(cmd.symbol.as_str()))?;

        let order_id = self.next_order_id().await?;
        let mut order = Order::new(order_id, account_id.clone(), cmd);
        let mut events = order.drain_events();

        let position = self
            .store
            .find_position(account_id, order.symbol())
            .await?;
        let available = position
            .as_ref()
            .map_or(Quantity::ZERO, Position::available_quantity);

        let approval = match PreTradeCheck::evaluate(&order, &account, available, &instrument) {
            Ok(approval) => approval,
            Err(reason) => {
                order.reject(reason)?;
                events.extend(order.drain_events());
                self.committer
                    .commit(&LedgerChangeSet::order_only(OrderWrite::Insert(order.clone())))
                    .await?;
                Self::log_rejected(&order);
                publish_committed(&self.notifier, &order, events, started);
                return Ok(OrderView::from_order(&order));
            }
        };

        self.committer
            .commit(&LedgerChangeSet::order_only(OrderWrite::Insert(order.clone())))
            .await?;
        tracing::info!(
            order_id = %order.id(),
            account_id = %account_id,
            symbol = %order.symbol(),
            order_type = %order.order_type(),
            side = %order.transaction_type(),
            quantity = %order.quantity(),
            "Order placed"
        );

        // the PENDING order is durable from here on; its events go out even
        // if the dispatch below cannot be committed
        let placed = order.clone();
        let position =
            position.unwrap_or_else(|| Position::open(account_id.clone(), order.symbol().clone()));
        let changes = match order.order_type().execution_mode() {
            ExecutionMode::Immediate => {
                Self::dispatch_market(&mut order, &account, &position, approval)
            }
            ExecutionMode::Resting => Self::dispatch_resting(&mut order, account, position),
        };
        let changes = match changes {
            Ok(changes) => changes,
            Err(e) => {
                publish_committed(&self.notifier, &placed, events, started);
                return Err(e);
            }
        };
        let dispatched = order.drain_events();

        if let Err(e) = self.committer.commit(&changes).await {
            tracing::error!(
                order_id = %order.id(),
                account_id = %account_id,
                error = %e,
                "Order dispatch could not be committed, order left PENDING"
            );
            publish_committed(&self.notifier, &placed, events, started);
            return Err(e.into());
        }

        match order.rejection_reason() {
            Some(_) => Self::log_rejected(&order),
            None => tracing::info!(
                order_id = %order.id(),
                account_id = %account_id,
                status = %order.status(),
                executed_price = ?order.executed_price(),
                "Order dispatched"
            ),
        }
        events.extend(dispatched);
        publish_committed(&self.notifier, &order, events, started);

        Ok(OrderView::from_order(&order))
    }

    /// Settle a MARKET order at the approved price.
    fn dispatch_market(
        order: &mut Order,
        account: &Account,
        position: &Position,
        approval: PreTradeApproval,
    ) -> Result<LedgerChangeSet, EngineError> {
        let Some(price) = approval.execution_price else {
            order.reject(RejectReason::quotes_unavailable(order.symbol()))?;
            return Ok(LedgerChangeSet::order_only(OrderWrite::Update(order.clone())));
        };

        match Settlement::execute(order, account, position, price) {
            Ok(settled) => Ok(LedgerChangeSet::order_only(OrderWrite::Update(order.clone()))
                .with_account(settled.account)
                .with_position(settled.position)
                .with_trade(settled.trade)),
            Err(e) => {
                order.reject(e.reject_reason())?;
                Ok(LedgerChangeSet::order_only(OrderWrite::Update(order.clone())))
            }
        }
    }

    /// Open a resting order and reserve its funds (BUY) or shares (SELL).
    fn dispatch_resting(
        order: &mut Order,
        mut account: Account,
        mut position: Position,
    ) -> Result<LedgerChangeSet, EngineError> {
        order.open()?;

        let reserved = match order.transaction_type() {
            TransactionType::Buy => account
                .reserve(order.reserved_funds())
                .map_err(SettlementError::from),
            TransactionType::Sell => position
                .reserve_quantity(order.reserved_shares())
                .map_err(SettlementError::from),
        };

        let changes = match reserved {
            Ok(()) => match order.transaction_type() {
                TransactionType::Buy => {
                    LedgerChangeSet::order_only(OrderWrite::Update(order.clone())).with_account(account)
                }
                TransactionType::Sell => LedgerChangeSet::order_only(OrderWrite::Update(order.clone()))
                    .with_position(position),
            },
            Err(e) => {
                order.reject(e.reject_reason())?;
                LedgerChangeSet::order_only(OrderWrite::Update(order.clone()))
            }
        };
        Ok(changes)
    }

    /// Draw a fresh order id that is not in use.
    async fn next_order_id(&self) -> Result<OrderId, EngineError> {
        for _ in 0..MAX_ORDER_ID_ATTEMPTS {
            let candidate = OrderId::generate();
            if !self.store.order_exists(&candidate).await? {
                return Ok(candidate);
            }
            tracing::warn!(order_id = %candidate, "Generated order id already in use, regenerating");
        }
        Err(EngineError::internal(format!(
            "Could not generate an unused order id after {MAX_ORDER_ID_ATTEMPTS} attempts"
        )))
    }

    fn log_rejected(order: &Order) {
        if let Some(reason) = order.rejection_reason() {
            tracing::info!(
                order_id = %order.id(),
                account_id = %order.account_id(),
                symbol = %order.symbol(),
                reason = %reason.code,
                "Order rejected: {}",
                reason.message
            );
        }
    }
}
