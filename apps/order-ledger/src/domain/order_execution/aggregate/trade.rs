//! Trade record written for every execution.

use serde::{Deserialize, Serialize};

use super::Order;
use crate::domain::order_execution::value_objects::TransactionType;
use crate::domain::shared::{AccountId, Money, OrderId, Quantity, Symbol, Timestamp, TradeId};

/// Immutable record of one order execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    id: TradeId,
    order_id: OrderId,
    account_id: AccountId,
    symbol: Symbol,
    transaction_type: TransactionType,
    quantity: Quantity,
    price: Money,
    total_amount: Money,
    executed_at: Timestamp,
}

impl Trade {
    /// Record the full execution of `order` at `price`.
    #[must_use]
    pub fn record(id: TradeId, order: &Order, price: Money) -> Self {
        Self {
            id,
            order_id: order.id().clone(),
            account_id: order.account_id().clone(),
            symbol: order.symbol().clone(),
            transaction_type: order.transaction_type(),
            quantity: order.quantity(),
            price,
            total_amount: price * order.quantity(),
            executed_at: Timestamp::now(),
        }
    }

    /// Get the trade ID.
    #[must_use]
    pub const fn id(&self) -> &TradeId {
        &self.id
    }

    /// Get the executed order.
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        &self.order_id
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

    /// Get the direction.
    #[must_use]
    pub const fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// Get the executed quantity.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Get the execution price.
    #[must_use]
    pub const fn price(&self) -> Money {
        self.price
    }

    /// `quantity * price`.
    #[must_use]
    pub const fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// Get the execution timestamp.
    #[must_use]
    pub const fn executed_at(&self) -> Timestamp {
        self.executed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_execution::aggregate::PlaceOrderCommand;
    use crate::domain::order_execution::value_objects::{OrderType, Validity};
    use rust_decimal_macros::dec;

    #[test]
    fn trade_totals_quantity_times_price() {
        let order = Order::new(
            OrderId::new("ORD-1"),
            AccountId::new("acct-1"),
            PlaceOrderCommand {
                symbol: Symbol::new("INFY"),
                transaction_type: TransactionType::Sell,
                order_type: OrderType::Market,
                quantity: Quantity::new(4),
                price: None,
                trigger_price: None,
                validity: Validity::Day,
                disclosed_quantity: None,
                notes: None,
            },
        );

        let trade = Trade::record(TradeId::new("TXN-1"), &order, Money::new(dec!(110)));

        assert_eq!(trade.total_amount(), Money::new(dec!(440)));
        assert_eq!(trade.order_id().as_str(), "ORD-1");
        assert_eq!(trade.transaction_type(), TransactionType::Sell);
    }
}
