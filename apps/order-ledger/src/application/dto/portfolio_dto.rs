//! Account and Portfolio DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order_dto::present;
use crate::domain::ledger::Account;
use crate::domain::portfolio::{PortfolioSummary, StockPerformance, ValuedPosition};
use crate::domain::shared::Timestamp;

/// DTO representing an account's balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    /// Account ID.
    pub account_id: String,
    /// Cash balance.
    pub available_balance: Decimal,
    /// Margin blocked by open orders.
    pub used_margin: Decimal,
    /// `available_balance - used_margin`.
    pub free_margin: Decimal,
    /// Created at.
    pub created_at: Timestamp,
    /// Updated at.
    pub updated_at: Timestamp,
}

impl AccountView {
    /// Create from domain Account.
    #[must_use]
    pub fn from_account(account: &Account) -> Self {
        Self {
            account_id: account.id().to_string(),
            available_balance: present(account.available_balance()),
            used_margin: present(account.used_margin()),
            free_margin: present(account.free_margin()),
            created_at: account.created_at(),
            updated_at: account.updated_at(),
        }
    }
}

/// DTO representing a position valued at the latest price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionView {
    /// Symbol.
    pub symbol: String,
    /// Shares held.
    pub quantity: u32,
    /// Shares blocked by open SELL orders.
    pub reserved_quantity: u32,
    /// Weighted-average cost.
    pub average_cost: Decimal,
    /// Capital in the held shares.
    pub invested_amount: Decimal,
    /// Latest known price.
    pub current_price: Option<Decimal>,
    /// Value at the latest price.
    pub current_value: Decimal,
    /// Unrealized P&L.
    pub unrealized_pnl: Decimal,
    /// Cumulative realized P&L.
    pub realized_pnl: Decimal,
}

impl PositionView {
    /// Create from a valued position.
    #[must_use]
    pub fn from_valued(holding: &ValuedPosition) -> Self {
        let position = &holding.position;
        Self {
            symbol: position.symbol().to_string(),
            quantity: position.quantity().value(),
            reserved_quantity: position.reserved_quantity().value(),
            average_cost: present(position.average_cost()),
            invested_amount: present(position.invested_amount()),
            current_price: holding.valuation.price.map(present),
            current_value: present(holding.valuation.current_value),
            unrealized_pnl: present(holding.valuation.unrealized_pnl),
            realized_pnl: present(position.realized_pnl()),
        }
    }
}

/// DTO representing portfolio totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummaryView {
    /// Value of open positions.
    pub total_value: Decimal,
    /// Capital in open positions.
    pub total_invested: Decimal,
    /// Unrealized P&L.
    pub unrealized_pnl: Decimal,
    /// Realized P&L, closed positions included.
    pub realized_pnl: Decimal,
    /// Unrealized plus realized.
    pub total_pnl: Decimal,
    /// Return on invested capital, in percent.
    pub return_percent: Decimal,
    /// Positions holding shares.
    pub active_holdings: usize,
    /// Cash balance.
    pub available_balance: Decimal,
    /// Blocked margin.
    pub used_margin: Decimal,
    /// Spendable buying power.
    pub free_margin: Decimal,
}

impl From<&PortfolioSummary> for PortfolioSummaryView {
    fn from(summary: &PortfolioSummary) -> Self {
        Self {
            total_value: present(summary.total_value),
            total_invested: present(summary.total_invested),
            unrealized_pnl: present(summary.unrealized_pnl),
            realized_pnl: present(summary.realized_pnl),
            total_pnl: present(summary.total_pnl),
            return_percent: summary.return_percent,
            active_holdings: summary.active_holdings,
            available_balance: present(summary.available_balance),
            used_margin: present(summary.used_margin),
            free_margin: present(summary.free_margin),
        }
    }
}

/// DTO representing one instrument's return breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPerformanceView {
    /// Symbol.
    pub symbol: String,
    /// Shares held.
    pub quantity: u32,
    /// Weighted-average cost.
    pub average_cost: Decimal,
    /// Latest known price.
    pub current_price: Option<Decimal>,
    /// Capital in the held shares.
    pub invested_amount: Decimal,
    /// Value at the latest price.
    pub current_value: Decimal,
    /// Unrealized P&L.
    pub unrealized_pnl: Decimal,
    /// Realized P&L.
    pub realized_pnl: Decimal,
    /// Return in percent.
    pub return_percent: Decimal,
}

impl From<&StockPerformance> for StockPerformanceView {
    fn from(perf: &StockPerformance) -> Self {
        Self {
            symbol: perf.symbol.to_string(),
            quantity: perf.quantity.value(),
            average_cost: present(perf.average_cost),
            current_price: perf.current_price.map(present),
            invested_amount: present(perf.invested_amount),
            current_value: present(perf.current_value),
            unrealized_pnl: present(perf.unrealized_pnl),
            realized_pnl: present(perf.realized_pnl),
            return_percent: perf.return_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::portfolio::Position;
    use crate::domain::shared::{AccountId, Money, Quantity, Symbol};
    use rust_decimal_macros::dec;

    #[test]
    fn account_view_reports_free_margin() {
        let mut account = Account::open(AccountId::new("acct-1"), Money::new(dec!(1000))).unwrap();
        account.reserve(Money::new(dec!(250.555))).unwrap();

        let view = AccountView::from_account(&account);

        assert_eq!(view.used_margin, dec!(250.56));
        assert_eq!(view.free_margin, dec!(749.44));
    }

    #[test]
    fn position_view_rounds_average_cost() {
        let mut position = Position::open(AccountId::new("acct-1"), Symbol::new("INFY"));
        position.apply_buy(Quantity::new(3), Money::new(dec!(100))).unwrap();
        position.apply_buy(Quantity::new(3), Money::new(dec!(101))).unwrap();
        position.apply_buy(Quantity::new(1), Money::new(dec!(102))).unwrap();

        let view = PositionView::from_valued(&ValuedPosition::at_price(
            position,
            Some(Money::new(dec!(105))),
        ));

        // 705 / 7 = 100.7142... held at 4 dp, shown at 2
        assert_eq!(view.average_cost, dec!(100.71));
        assert_eq!(view.current_value, dec!(735.00));
        assert_eq!(view.current_price, Some(dec!(105.00)));
    }
}
