//! Order and Trade DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order_execution::{
    Order, OrderStatus, OrderType, RejectReason, Trade, TransactionType, Validity,
};
use crate::domain::shared::{Money, Timestamp};

/// DTO representing an order.
///
/// Money fields are rounded to 2 dp for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderView {
    /// Order ID.
    pub order_id: String,
    /// Owning account.
    pub account_id: String,
    /// Symbol.
    pub symbol: String,
    /// BUY or SELL.
    pub transaction_type: TransactionType,
    /// Type.
    pub order_type: OrderType,
    /// Quantity.
    pub quantity: u32,
    /// Limit price.
    pub price: Option<Decimal>,
    /// Trigger price.
    pub trigger_price: Option<Decimal>,
    /// Validity.
    pub validity: Validity,
    /// Disclosed quantity.
    pub disclosed_quantity: Option<u32>,
    /// Notes.
    pub notes: Option<String>,
    /// Status.
    pub status: OrderStatus,
    /// Execution price.
    pub executed_price: Option<Decimal>,
    /// Executed quantity.
    pub executed_quantity: u32,
    /// `quantity - executed_quantity`.
    pub remaining_quantity: u32,
    /// `quantity * (price or executed_price)`, when either is known.
    pub total_value: Option<Decimal>,
    /// `executed_quantity * executed_price`.
    pub executed_value: Option<Decimal>,
    /// Why the order was rejected.
    pub rejection_reason: Option<RejectReason>,
    /// Created at.
    pub created_at: Timestamp,
    /// Updated at.
    pub updated_at: Timestamp,
    /// Executed at.
    pub executed_at: Option<Timestamp>,
}

impl OrderView {
    /// Create from domain Order.
    #[must_use]
    pub fn from_order(order: &Order) -> Self {
        let quantity = order.quantity();
        let total_value = order
            .price()
            .or(order.executed_price())
            .map(|price| present(price * quantity));
        let executed_value = order
            .executed_price()
            .map(|price| present(price * order.executed_quantity()));

        Self {
            order_id: order.id().to_string(),
            account_id: order.account_id().to_string(),
            symbol: order.symbol().to_string(),
            transaction_type: order.transaction_type(),
            order_type: order.order_type(),
            quantity: quantity.value(),
            price: order.price().map(present),
            trigger_price: order.trigger_price().map(present),
            validity: order.validity(),
            disclosed_quantity: order.disclosed_quantity().map(|q| q.value()),
            notes: order.notes().map(str::to_string),
            status: order.status(),
            executed_price: order.executed_price().map(present),
            executed_quantity: order.executed_quantity().value(),
            remaining_quantity: order.remaining_quantity().value(),
            total_value,
            executed_value,
            rejection_reason: order.rejection_reason().cloned(),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
            executed_at: order.executed_at(),
        }
    }
}

/// DTO representing an execution record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeView {
    /// Trade ID.
    pub trade_id: String,
    /// Order that executed.
    pub order_id: String,
    /// Account.
    pub account_id: String,
    /// Symbol.
    pub symbol: String,
    /// BUY or SELL.
    pub transaction_type: TransactionType,
    /// Shares executed.
    pub quantity: u32,
    /// Execution price.
    pub price: Decimal,
    /// `quantity * price`.
    pub total_amount: Decimal,
    /// Executed at.
    pub executed_at: Timestamp,
}

impl TradeView {
    /// Create from domain Trade.
    #[must_use]
    pub fn from_trade(trade: &Trade) -> Self {
        Self {
            trade_id: trade.id().to_string(),
            order_id: trade.order_id().to_string(),
            account_id: trade.account_id().to_string(),
            symbol: trade.symbol().to_string(),
            transaction_type: trade.transaction_type(),
            quantity: trade.quantity().value(),
            price: present(trade.price()),
            total_amount: present(trade.total_amount()),
            executed_at: trade.executed_at(),
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 0-based page index.
    pub page: usize,
    /// Requested page size.
    pub size: usize,
    /// Items across all pages.
    pub total_items: usize,
    /// `ceil(total_items / size)`.
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Assemble a page.
    #[must_use]
    pub const fn new(items: Vec<T>, page: usize, size: usize, total_items: usize) -> Self {
        Self {
            items,
            page,
            size,
            total_items,
            total_pages: total_items.div_ceil(size),
        }
    }
}

/// Money rounded for presentation.
pub(crate) fn present(money: Money) -> Decimal {
    money.round().amount()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_execution::PlaceOrderCommand;
    use crate::domain::shared::{AccountId, OrderId, Quantity, Symbol, TradeId};
    use rust_decimal_macros::dec;

    fn limit_buy(qty: u32, price: Decimal) -> Order {
        Order::new(
            OrderId::new("ORD-1"),
            AccountId::new("acct-1"),
            PlaceOrderCommand {
                symbol: Symbol::new("infy"),
                transaction_type: TransactionType::Buy,
                order_type: OrderType::Limit,
                quantity: Quantity::new(qty),
                price: Some(Money::new(price)),
                trigger_price: None,
                validity: Validity::Day,
                disclosed_quantity: None,
                notes: Some("swing".to_string()),
            },
        )
    }

    #[test]
    fn open_order_view_uses_limit_price_for_total() {
        let view = OrderView::from_order(&limit_buy(3, dec!(100.125)));

        assert_eq!(view.symbol, "INFY");
        assert_eq!(view.price, Some(dec!(100.12)));
        assert_eq!(view.total_value, Some(dec!(300.38)));
        assert_eq!(view.executed_value, None);
        assert_eq!(view.remaining_quantity, 3);
        assert_eq!(view.notes.as_deref(), Some("swing"));
    }

    #[test]
    fn executed_order_view_reports_executed_value() {
        let mut order = limit_buy(10, dec!(100));
        order.open().unwrap();
        order.complete(Money::new(dec!(99.5)), TradeId::new("TXN-1")).unwrap();

        let view = OrderView::from_order(&order);

        assert_eq!(view.status, OrderStatus::Complete);
        assert_eq!(view.executed_value, Some(dec!(995.00)));
        assert_eq!(view.remaining_quantity, 0);
        assert!(view.executed_at.is_some());
    }

    #[test]
    fn page_counts_partial_last_page() {
        let page = Page::new(vec![1, 2], 2, 5, 12);
        assert_eq!(page.total_pages, 3);

        let empty: Page<u8> = Page::new(Vec::new(), 0, 10, 0);
        assert_eq!(empty.total_pages, 0);
    }
}
