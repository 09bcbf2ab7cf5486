//! Order Aggregate Root
//!
//! The Order aggregate owns an order's lifecycle. The Ledger and Position
//! Book never see it; they receive derived amounts and quantities.

use serde::{Deserialize, Serialize};

use crate::domain::order_execution::errors::OrderError;
use crate::domain::order_execution::events::{
    OrderCancelled, OrderEvent, OrderExecuted, OrderPlaced, OrderRejected,
};
use crate::domain::order_execution::services::OrderStateMachine;
use crate::domain::order_execution::value_objects::{
    CancelReason, ExecutionMode, FieldViolation, OrderStatus, OrderType, RejectReason,
    TransactionType, Validity,
};
use crate::domain::shared::{AccountId, Money, OrderId, Quantity, Symbol, Timestamp, TradeId};

/// Longest accepted free-text note.
pub const MAX_NOTES_LEN: usize = 500;

/// Command to place a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderCommand {
    /// Symbol to trade.
    pub symbol: Symbol,
    /// Buy or sell.
    pub transaction_type: TransactionType,
    /// Order type.
    pub order_type: OrderType,
    /// Quantity to trade.
    pub quantity: Quantity,
    /// Limit price (required for LIMIT).
    #[serde(default)]
    pub price: Option<Money>,
    /// Trigger price (required for SL and `SL_M`).
    #[serde(default)]
    pub trigger_price: Option<Money>,
    /// Validity, stored only.
    #[serde(default)]
    pub validity: Validity,
    /// Disclosed quantity, stored only.
    #[serde(default)]
    pub disclosed_quantity: Option<Quantity>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl PlaceOrderCommand {
    /// Validate the request shape, collecting every offending field.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Validation`] listing each invalid field.
    pub fn validate(&self, max_quantity: Quantity) -> Result<(), OrderError> {
        let mut violations = Vec::new();

        if let Err(e) = self.symbol.validate() {
            violations.push(FieldViolation::from(e));
        }
        if let Err(e) = self.quantity.validate_for_order(max_quantity) {
            violations.push(FieldViolation::from(e));
        }

        if self.order_type.requires_price() && self.price.is_none() {
            violations.push(FieldViolation::new(
                "price",
                format!("required for {} orders", self.order_type),
            ));
        }
        if self.order_type.requires_trigger_price() && self.trigger_price.is_none() {
            violations.push(FieldViolation::new(
                "trigger_price",
                format!("required for {} orders", self.order_type),
            ));
        }
        if let Some(price) = self.price
            && let Err(e) = price.validate_as_price("price")
        {
            violations.push(FieldViolation::from(e));
        }
        if let Some(trigger) = self.trigger_price
            && let Err(e) = trigger.validate_as_price("trigger_price")
        {
            violations.push(FieldViolation::from(e));
        }

        if let Some(disclosed) = self.disclosed_quantity
            && disclosed > self.quantity
        {
            violations.push(FieldViolation::new(
                "disclosed_quantity",
                "must not exceed quantity",
            ));
        }
        if let Some(notes) = &self.notes
            && notes.chars().count() > MAX_NOTES_LEN
        {
            violations.push(FieldViolation::new(
                "notes",
                format!("must be at most {MAX_NOTES_LEN} characters"),
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(OrderError::Validation { violations })
        }
    }
}

/// Order Aggregate Root.
// `order_type` mirrors the request field; `kind` would read worse at call sites.
#[allow(clippy::struct_field_names)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    account_id: AccountId,
    symbol: Symbol,
    transaction_type: TransactionType,
    order_type: OrderType,
    quantity: Quantity,
    price: Option<Money>,
    trigger_price: Option<Money>,
    validity: Validity,
    disclosed_quantity: Option<Quantity>,
    notes: Option<String>,
    status: OrderStatus,
    executed_price: Option<Money>,
    executed_quantity: Quantity,
    rejection_reason: Option<RejectReason>,
    #[serde(skip)]
    events: Vec<OrderEvent>,
    created_at: Timestamp,
    updated_at: Timestamp,
    executed_at: Option<Timestamp>,
}

impl Order {
    /// Create a PENDING order from an already validated command.
    ///
    /// Generates an `OrderPlaced` event.
    #[must_use]
    pub fn new(id: OrderId, account_id: AccountId, cmd: PlaceOrderCommand) -> Self {
        let now = Timestamp::now();

        let mut order = Self {
            id,
            account_id,
            symbol: cmd.symbol,
            transaction_type: cmd.transaction_type,
            order_type: cmd.order_type,
            quantity: cmd.quantity,
            price: cmd.price,
            trigger_price: cmd.trigger_price,
            validity: cmd.validity,
            disclosed_quantity: cmd.disclosed_quantity,
            notes: cmd.notes,
            status: OrderStatus::Pending,
            executed_price: None,
            executed_quantity: Quantity::ZERO,
            rejection_reason: None,
            events: Vec::new(),
            created_at: now,
            updated_at: now,
            executed_at: None,
        };

        order.events.push(OrderEvent::Placed(OrderPlaced {
            order_id: order.id.clone(),
            account_id: order.account_id.clone(),
            symbol: order.symbol.clone(),
            transaction_type: order.transaction_type,
            order_type: order.order_type,
            quantity: order.quantity,
            price: order.price,
            occurred_at: now,
        }));

        order
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Get the order ID.
    #[must_use]
    pub const fn id(&self) -> &OrderId {
        &self.id
    }

    /// Get the owning account.
    #[must_use]
    pub const fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Get the symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Get the transaction type.
    #[must_use]
    pub const fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// Get the order type.
    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Get the quantity.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Get the limit price.
    #[must_use]
    pub const fn price(&self) -> Option<Money> {
        self.price
    }

    /// Get the trigger price.
    #[must_use]
    pub const fn trigger_price(&self) -> Option<Money> {
        self.trigger_price
    }

    /// Get the validity.
    #[must_use]
    pub const fn validity(&self) -> Validity {
        self.validity
    }

    /// Get the disclosed quantity.
    #[must_use]
    pub const fn disclosed_quantity(&self) -> Option<Quantity> {
        self.disclosed_quantity
    }

    /// Get the notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Get the current status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Get the execution price, set once executed.
    #[must_use]
    pub const fn executed_price(&self) -> Option<Money> {
        self.executed_price
    }

    /// Get the executed quantity.
    #[must_use]
    pub const fn executed_quantity(&self) -> Quantity {
        self.executed_quantity
    }

    /// Shares not yet executed.
    #[must_use]
    pub const fn remaining_quantity(&self) -> Quantity {
        self.quantity.saturating_sub(self.executed_quantity)
    }

    /// Get the rejection reason, set once rejected.
    #[must_use]
    pub const fn rejection_reason(&self) -> Option<&RejectReason> {
        self.rejection_reason.as_ref()
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Get the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Get the execution timestamp.
    #[must_use]
    pub const fn executed_at(&self) -> Option<Timestamp> {
        self.executed_at
    }

    /// Returns true if `account_id` placed this order.
    #[must_use]
    pub fn belongs_to(&self, account_id: &AccountId) -> bool {
        &self.account_id == account_id
    }

    // ========================================================================
    // Costing
    // ========================================================================

    /// Price used to cost the order.
    ///
    /// MARKET orders use `market_price`; LIMIT uses its limit price; SL and
    /// `SL_M` use the limit price when given, otherwise the trigger price.
    #[must_use]
    pub fn costing_price(&self, market_price: Option<Money>) -> Option<Money> {
        match self.order_type {
            OrderType::Market => market_price,
            OrderType::Limit => self.price,
            OrderType::Sl | OrderType::SlM => self.price.or(self.trigger_price),
        }
    }

    /// Cash blocked while a resting BUY order is open.
    ///
    /// Derived from stored fields only, so placement and release always
    /// agree. Zero for SELL and MARKET orders.
    #[must_use]
    pub fn reserved_funds(&self) -> Money {
        match (self.transaction_type, self.order_type.execution_mode()) {
            (TransactionType::Buy, ExecutionMode::Resting) => self
                .costing_price(None)
                .map_or(Money::ZERO, |price| price * self.quantity),
            _ => Money::ZERO,
        }
    }

    /// Shares blocked while a resting SELL order is open.
    #[must_use]
    pub fn reserved_shares(&self) -> Quantity {
        match (self.transaction_type, self.order_type.execution_mode()) {
            (TransactionType::Sell, ExecutionMode::Resting) => self.quantity,
            _ => Quantity::ZERO,
        }
    }

    // ========================================================================
    // State Transitions
    // ========================================================================

    /// Move a resting order to OPEN.
    ///
    /// # Errors
    ///
    /// Returns error unless the order is PENDING.
    pub fn open(&mut self) -> Result<(), OrderError> {
        self.transition_to(OrderStatus::Open)
    }

    /// Record a full execution at `price`.
    ///
    /// Generates an `OrderExecuted` event.
    ///
    /// # Errors
    ///
    /// Returns error unless the order is PENDING, OPEN or PARTIAL.
    pub fn complete(&mut self, price: Money, trade_id: TradeId) -> Result<(), OrderError> {
        self.transition_to(OrderStatus::Complete)?;

        self.executed_price = Some(price);
        self.executed_quantity = self.quantity;
        self.executed_at = Some(self.updated_at);

        self.events.push(OrderEvent::Executed(OrderExecuted {
            order_id: self.id.clone(),
            account_id: self.account_id.clone(),
            trade_id,
            executed_quantity: self.executed_quantity,
            executed_price: price,
            occurred_at: self.updated_at,
        }));

        Ok(())
    }

    /// Cancel the order.
    ///
    /// Generates an `OrderCancelled` event.
    ///
    /// # Errors
    ///
    /// Returns `CannotCancel` unless the order is PENDING or OPEN.
    pub fn cancel(&mut self, reason: CancelReason) -> Result<(), OrderError> {
        if !self.status.is_cancelable() {
            return Err(OrderError::CannotCancel {
                status: self.status,
            });
        }
        self.transition_to(OrderStatus::Cancelled)?;

        self.events.push(OrderEvent::Cancelled(OrderCancelled {
            order_id: self.id.clone(),
            account_id: self.account_id.clone(),
            reason,
            occurred_at: self.updated_at,
        }));

        Ok(())
    }

    /// Reject the order with a stored reason.
    ///
    /// Generates an `OrderRejected` event.
    ///
    /// # Errors
    ///
    /// Returns error unless the order is PENDING or OPEN.
    pub fn reject(&mut self, reason: RejectReason) -> Result<(), OrderError> {
        self.transition_to(OrderStatus::Rejected)?;

        self.rejection_reason = Some(reason.clone());
        self.events.push(OrderEvent::Rejected(OrderRejected {
            order_id: self.id.clone(),
            account_id: self.account_id.clone(),
            reason,
            occurred_at: self.updated_at,
        }));

        Ok(())
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Drain accumulated domain events.
    pub fn drain_events(&mut self) -> Vec<OrderEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get pending events without draining.
    #[must_use]
    pub fn pending_events(&self) -> &[OrderEvent] {
        &self.events
    }

    // ========================================================================
    // Private Helpers
    // ========================================================================

    fn transition_to(&mut self, target: OrderStatus) -> Result<(), OrderError> {
        OrderStateMachine::validate_transition(self.status, target)?;
        self.status = target;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
