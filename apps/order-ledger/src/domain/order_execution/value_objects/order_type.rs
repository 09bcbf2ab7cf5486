//! Order type (market, limit, stop-loss).

use serde::{Deserialize, Serialize};
use std::fmt;

/// When an order is carried out after it passes pre-trade checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Filled in full, synchronously, at the current price.
    Immediate,
    /// Held OPEN with its collateral blocked until executed or cancelled.
    Resting,
}

/// Order type specifying execution behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Market order - execute now at the current price.
    Market,
    /// Limit order - rests at the given price.
    Limit,
    /// Stop-loss order with a limit price.
    #[serde(rename = "SL")]
    Sl,
    /// Stop-loss market order.
    #[serde(rename = "SL_M")]
    SlM,
}

impl OrderType {
    /// Returns true if this order type requires a limit price.
    #[must_use]
    pub const fn requires_price(&self) -> bool {
        matches!(self, Self::Limit)
    }

    /// Returns true if this order type requires a trigger price.
    #[must_use]
    pub const fn requires_trigger_price(&self) -> bool {
        matches!(self, Self::Sl | Self::SlM)
    }

    /// Returns true if this is a market order.
    #[must_use]
    pub const fn is_market(&self) -> bool {
        matches!(self, Self::Market)
    }

    /// How the engine dispatches this order type.
    #[must_use]
    pub const fn execution_mode(&self) -> ExecutionMode {
        match self {
            Self::Market => ExecutionMode::Immediate,
            Self::Limit | Self::Sl | Self::SlM => ExecutionMode::Resting,
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "MARKET",
            Self::Limit => "LIMIT",
            Self::Sl => "SL",
            Self::SlM => "SL_M",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_type_price_requirements() {
        assert!(!OrderType::Market.requires_price());
        assert!(OrderType::Limit.requires_price());
        assert!(!OrderType::Sl.requires_price());
        assert!(OrderType::Sl.requires_trigger_price());
        assert!(OrderType::SlM.requires_trigger_price());
        assert!(!OrderType::Limit.requires_trigger_price());
    }

    #[test]
    fn only_market_orders_execute_immediately() {
        assert_eq!(OrderType::Market.execution_mode(), ExecutionMode::Immediate);
        for order_type in [OrderType::Limit, OrderType::Sl, OrderType::SlM] {
            assert_eq!(order_type.execution_mode(), ExecutionMode::Resting);
        }
    }

    #[test]
    fn order_type_serde_names() {
        assert_eq!(serde_json::to_string(&OrderType::SlM).unwrap(), "\"SL_M\"");
        assert_eq!(serde_json::to_string(&OrderType::Sl).unwrap(), "\"SL\"");
        let parsed: OrderType = serde_json::from_str("\"MARKET\"").unwrap();
        assert_eq!(parsed, OrderType::Market);
        assert_eq!(OrderType::SlM.to_string(), "SL_M");
    }
}
