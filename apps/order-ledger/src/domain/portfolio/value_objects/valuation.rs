//! Mark-to-market valuation of a single position.

use serde::{Deserialize, Serialize};

use crate::domain::portfolio::aggregate::Position;
use crate::domain::shared::Money;

/// Result of marking a position to a price.
///
/// Zero value and zero unrealized P&L when the position is flat or no price
/// is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionValuation {
    /// Price used, if one was available.
    pub price: Option<Money>,
    /// `price * quantity`.
    pub current_value: Money,
    /// `current_value - invested_amount`.
    pub unrealized_pnl: Money,
}

impl PositionValuation {
    /// Valuation with nothing to mark.
    #[must_use]
    pub const fn unpriced(price: Option<Money>) -> Self {
        Self {
            price,
            current_value: Money::ZERO,
            unrealized_pnl: Money::ZERO,
        }
    }
}

/// A position paired with its on-demand valuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuedPosition {
    /// The stored position.
    pub position: Position,
    /// Valuation at the latest known price.
    pub valuation: PositionValuation,
}

impl ValuedPosition {
    /// Value `position` at `price`.
    #[must_use]
    pub fn at_price(position: Position, price: Option<Money>) -> Self {
        let valuation = position.mark_to_market(price);
        Self {
            position,
            valuation,
        }
    }
}
