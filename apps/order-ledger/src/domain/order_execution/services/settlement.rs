//! Settlement of an execution across the position book, the ledger and the
//! order.

use std::fmt;

use crate::domain::ledger::{Account, LedgerError};
use crate::domain::order_execution::aggregate::{Order, Trade};
use crate::domain::order_execution::errors::OrderError;
use crate::domain::order_execution::value_objects::{RejectReason, TransactionType};
use crate::domain::portfolio::{Position, PositionError};
use crate::domain::shared::{Money, TradeId};

/// Post-execution state, to be committed as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledExecution {
    /// Account after the cash movement.
    pub account: Account,
    /// Position after lot accounting, marked at the execution price.
    pub position: Position,
    /// Trade record.
    pub trade: Trade,
}

/// Why an execution could not be settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    /// Position book refused the trade.
    Position(PositionError),
    /// Ledger refused the cash movement.
    Ledger(LedgerError),
    /// Order was not in an executable state.
    Order(OrderError),
}

impl SettlementError {
    /// Reason to store on an order rejected because of this failure.
    #[must_use]
    pub fn reject_reason(&self) -> RejectReason {
        match self {
            Self::Position(PositionError::InsufficientHoldings {
                symbol,
                requested,
                available,
            }) => RejectReason::insufficient_holdings(symbol, *requested, *available),
            Self::Ledger(LedgerError::InsufficientFunds {
                required,
                available,
            }) => RejectReason::insufficient_funds(*required, *available),
            other => RejectReason::settlement_failed(other.to_string()),
        }
    }
}

impl fmt::Display for SettlementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(e) => write!(f, "Position update failed: {e}"),
            Self::Ledger(e) => write!(f, "Ledger update failed: {e}"),
            Self::Order(e) => write!(f, "Order update failed: {e}"),
        }
    }
}

impl std::error::Error for SettlementError {}

impl From<PositionError> for SettlementError {
    fn from(e: PositionError) -> Self {
        Self::Position(e)
    }
}

impl From<LedgerError> for SettlementError {
    fn from(e: LedgerError) -> Self {
        Self::Ledger(e)
    }
}

impl From<OrderError> for SettlementError {
    fn from(e: OrderError) -> Self {
        Self::Order(e)
    }
}

/// Applies a full execution: position first, then cash, then the order.
///
/// Works on copies of the account and position. On error nothing has
/// changed, the order included.
pub struct Settlement;

impl Settlement {
    /// Settle `order` in full at `price`.
    ///
    /// Any reservation the order held must already be released on
    /// `account`/`position` by the caller.
    ///
    /// # Errors
    ///
    /// Returns the first step that refused the execution.
    pub fn execute(
        order: &mut Order,
        account: &Account,
        position: &Position,
        price: Money,
    ) -> Result<SettledExecution, SettlementError> {
        let mut account = account.clone();
        let mut position = position.clone();
        let quantity = order.quantity();
        let amount = price * quantity;

        match order.transaction_type() {
            TransactionType::Buy => {
                position.apply_buy(quantity, price)?;
                account.settle_buy(amount)?;
            }
            TransactionType::Sell => {
                position.apply_sell(quantity, price)?;
                account.settle_sell(amount)?;
            }
        }
        let valuation = position.mark_to_market(Some(price));
        position.apply_valuation(&valuation);

        let trade = Trade::record(TradeId::generate(), order, price);
        order.complete(price, trade.id().clone())?;

        Ok(SettledExecution {
            account,
            position,
            trade,
        })
    }
}
