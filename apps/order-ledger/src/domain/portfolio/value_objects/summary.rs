//! Portfolio-level aggregates: account summary and per-stock performance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ValuedPosition;
use crate::domain::ledger::Account;
use crate::domain::shared::{Money, Quantity, Symbol};

/// Totals across every position of an account, plus its cash state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Sum of current values of open positions.
    pub total_value: Money,
    /// Sum of invested amounts of open positions.
    pub total_invested: Money,
    /// Sum of unrealized P&L.
    pub unrealized_pnl: Money,
    /// Sum of realized P&L, closed positions included.
    pub realized_pnl: Money,
    /// `unrealized_pnl + realized_pnl`.
    pub total_pnl: Money,
    /// `total_pnl / total_invested * 100`, zero when nothing is invested.
    pub return_percent: Decimal,
    /// Number of positions holding shares.
    pub active_holdings: usize,
    /// Cash balance.
    pub available_balance: Money,
    /// Margin blocked by open orders.
    pub used_margin: Money,
    /// Spendable buying power.
    pub free_margin: Money,
}

impl PortfolioSummary {
    /// Summarize `holdings` for `account`.
    #[must_use]
    pub fn compute(account: &Account, holdings: &[ValuedPosition]) -> Self {
        let open = || holdings.iter().filter(|h| h.position.is_open());

        let total_value: Money = open().map(|h| h.valuation.current_value).sum();
        let total_invested: Money = open().map(|h| h.position.invested_amount()).sum();
        let unrealized_pnl: Money = open().map(|h| h.valuation.unrealized_pnl).sum();
        let realized_pnl: Money = holdings.iter().map(|h| h.position.realized_pnl()).sum();
        let total_pnl = unrealized_pnl + realized_pnl;

        Self {
            total_value,
            total_invested,
            unrealized_pnl,
            realized_pnl,
            total_pnl,
            return_percent: total_pnl.percent_of(total_invested),
            active_holdings: open().count(),
            available_balance: account.available_balance(),
            used_margin: account.used_margin(),
            free_margin: account.free_margin(),
        }
    }
}

/// Return breakdown for one instrument, open or closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPerformance {
    /// Instrument.
    pub symbol: Symbol,
    /// Shares held.
    pub quantity: Quantity,
    /// Weighted-average cost.
    pub average_cost: Money,
    /// Latest known price.
    pub current_price: Option<Money>,
    /// Capital in the held shares.
    pub invested_amount: Money,
    /// Value at the latest price.
    pub current_value: Money,
    /// Unrealized P&L.
    pub unrealized_pnl: Money,
    /// Cumulative realized P&L.
    pub realized_pnl: Money,
    /// `(unrealized + realized) / (invested + max(realized, 0)) * 100`.
    pub return_percent: Decimal,
}

impl StockPerformance {
    /// Build the breakdown, or `None` for a position that never traded
    /// to a profit or loss and holds nothing.
    #[must_use]
    pub fn from_holding(holding: &ValuedPosition) -> Option<Self> {
        let position = &holding.position;
        if !position.is_open() && position.realized_pnl().is_zero() {
            return None;
        }

        let total_pnl = holding.valuation.unrealized_pnl + position.realized_pnl();
        let capital = position.invested_amount() + position.realized_pnl().max_zero();

        Some(Self {
            symbol: position.symbol().clone(),
            quantity: position.quantity(),
            average_cost: position.average_cost(),
            current_price: holding.valuation.price,
            invested_amount: position.invested_amount(),
            current_value: holding.valuation.current_value,
            unrealized_pnl: holding.valuation.unrealized_pnl,
            realized_pnl: position.realized_pnl(),
            return_percent: total_pnl.percent_of(capital),
        })
    }
}
