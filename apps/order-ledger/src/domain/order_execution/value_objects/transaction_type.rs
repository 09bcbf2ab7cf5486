//! Transaction type (buy or sell).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Buy shares with cash.
    Buy,
    /// Sell held shares for cash.
    Sell,
}

impl TransactionType {
    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_display_and_serde() {
        assert_eq!(TransactionType::Buy.to_string(), "BUY");
        assert_eq!(
            serde_json::to_string(&TransactionType::Sell).unwrap(),
            "\"SELL\""
        );
    }
}
