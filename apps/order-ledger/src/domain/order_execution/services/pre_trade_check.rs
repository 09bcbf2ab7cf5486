//! Pre-trade checks run before an order is dispatched.

use crate::domain::instrument::Instrument;
use crate::domain::ledger::Account;
use crate::domain::order_execution::aggregate::Order;
use crate::domain::order_execution::value_objects::{ExecutionMode, RejectReason, TransactionType};
use crate::domain::shared::{Money, Quantity};

/// Outcome of a passed pre-trade check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreTradeApproval {
    /// Cash the order needs: `costing price * quantity` for BUY, zero for SELL.
    pub required_funds: Money,
    /// Price a MARKET order executes at; `None` for resting orders.
    pub execution_price: Option<Money>,
}

/// Funds, holdings and tradability checks.
///
/// Checks run in a fixed order: funds (BUY), holdings (SELL), instrument
/// state, then quote availability for MARKET execution. Every check reads
/// state only; nothing is reserved here.
pub struct PreTradeCheck;

impl PreTradeCheck {
    /// Evaluate `order` against the account, the unreserved holdings in its
    /// symbol and one snapshot of the instrument.
    ///
    /// # Errors
    ///
    /// Returns the [`RejectReason`] the order must be rejected with.
    pub fn evaluate(
        order: &Order,
        account: &Account,
        available_shares: Quantity,
        instrument: &Instrument,
    ) -> Result<PreTradeApproval, RejectReason> {
        let market_price = instrument.current_price();

        let required_funds = match order.transaction_type() {
            TransactionType::Buy => {
                let price = order
                    .costing_price(market_price)
                    .ok_or_else(|| RejectReason::quotes_unavailable(order.symbol()))?;
                let required = price * order.quantity();
                let free = account.free_margin();
                if free < required {
                    return Err(RejectReason::insufficient_funds(required, free));
                }
                required
            }
            TransactionType::Sell => {
                if available_shares < order.quantity() {
                    return Err(RejectReason::insufficient_holdings(
                        order.symbol(),
                        order.quantity(),
                        available_shares,
                    ));
                }
                Money::ZERO
            }
        };

        if !instrument.is_active() {
            return Err(RejectReason::instrument_inactive(order.symbol()));
        }

        let execution_price = match order.order_type().execution_mode() {
            ExecutionMode::Immediate => Some(
                market_price.ok_or_else(|| RejectReason::quotes_unavailable(order.symbol()))?,
            ),
            ExecutionMode::Resting => None,
        };

        Ok(PreTradeApproval {
            required_funds,
            execution_price,
        })
    }
}
