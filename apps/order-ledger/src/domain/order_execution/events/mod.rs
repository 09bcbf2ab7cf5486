//! Domain events for order execution.
//!
//! Raised by the order aggregate and published only after the change that
//! produced them has been committed.

use serde::{Deserialize, Serialize};

use super::value_objects::{CancelReason, OrderType, RejectReason, TransactionType};
use crate::domain::shared::{AccountId, Money, OrderId, Quantity, Symbol, Timestamp, TradeId};

/// All possible order events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEvent {
    /// Order accepted into the engine.
    Placed(OrderPlaced),
    /// Order fully executed.
    Executed(OrderExecuted),
    /// Order cancelled by its owner.
    Cancelled(OrderCancelled),
    /// Order rejected.
    Rejected(OrderRejected),
}

impl OrderEvent {
    /// Get the order ID for this event.
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        match self {
            Self::Placed(e) => &e.order_id,
            Self::Executed(e) => &e.order_id,
            Self::Cancelled(e) => &e.order_id,
            Self::Rejected(e) => &e.order_id,
        }
    }

    /// Get the owning account.
    #[must_use]
    pub const fn account_id(&self) -> &AccountId {
        match self {
            Self::Placed(e) => &e.account_id,
            Self::Executed(e) => &e.account_id,
            Self::Cancelled(e) => &e.account_id,
            Self::Rejected(e) => &e.account_id,
        }
    }

    /// Get the timestamp when this event occurred.
    #[must_use]
    pub const fn occurred_at(&self) -> Timestamp {
        match self {
            Self::Placed(e) => e.occurred_at,
            Self::Executed(e) => e.occurred_at,
            Self::Cancelled(e) => e.occurred_at,
            Self::Rejected(e) => e.occurred_at,
        }
    }

    /// Get the event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Placed(_) => "ORDER_PLACED",
            Self::Executed(_) => "ORDER_EXECUTED",
            Self::Cancelled(_) => "ORDER_CANCELLED",
            Self::Rejected(_) => "ORDER_REJECTED",
        }
    }
}

/// Event: order accepted into the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    /// Order ID.
    pub order_id: OrderId,
    /// Owning account.
    pub account_id: AccountId,
    /// Instrument.
    pub symbol: Symbol,
    /// Buy or sell.
    pub transaction_type: TransactionType,
    /// Order type.
    pub order_type: OrderType,
    /// Quantity.
    pub quantity: Quantity,
    /// Limit price, if any.
    pub price: Option<Money>,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: order fully executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderExecuted {
    /// Order ID.
    pub order_id: OrderId,
    /// Owning account.
    pub account_id: AccountId,
    /// Trade recording the execution.
    pub trade_id: TradeId,
    /// Shares executed.
    pub executed_quantity: Quantity,
    /// Execution price.
    pub executed_price: Money,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: order cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelled {
    /// Order ID.
    pub order_id: OrderId,
    /// Owning account.
    pub account_id: AccountId,
    /// Reason for cancellation.
    pub reason: CancelReason,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: order rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRejected {
    /// Order ID.
    pub order_id: OrderId,
    /// Owning account.
    pub account_id: AccountId,
    /// Reason for rejection.
    pub reason: RejectReason,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}
