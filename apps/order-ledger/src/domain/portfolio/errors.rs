//! Position book errors.

use std::fmt;

use crate::domain::shared::{Quantity, Symbol};

/// Errors raised by position lot accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    /// Not enough unreserved shares for the requested sale or reservation.
    InsufficientHoldings {
        /// Instrument.
        symbol: Symbol,
        /// Shares requested.
        requested: Quantity,
        /// Shares available.
        available: Quantity,
    },

    /// The share count would exceed what a position can hold.
    QuantityOverflow {
        /// Instrument.
        symbol: Symbol,
        /// Shares already held.
        held: Quantity,
        /// Shares being added.
        added: Quantity,
    },

    /// Trade parameters are not usable for lot accounting.
    InvalidTrade {
        /// Field with invalid value.
        field: String,
        /// Error message.
        message: String,
    },
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientHoldings {
                symbol,
                requested,
                available,
            } => {
                write!(
                    f,
                    "Insufficient holdings in {symbol}: requested {requested}, available {available}"
                )
            }
            Self::QuantityOverflow {
                symbol,
                held,
                added,
            } => {
                write!(
                    f,
                    "Position in {symbol} cannot grow by {added}: {held} shares already held"
                )
            }
            Self::InvalidTrade { field, message } => {
                write!(f, "Invalid trade parameter '{field}': {message}")
            }
        }
    }
}

impl std::error::Error for PositionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_holdings_display() {
        let err = PositionError::InsufficientHoldings {
            symbol: Symbol::new("INFY"),
            requested: Quantity::new(12),
            available: Quantity::new(10),
        };
        let msg = err.to_string();
        assert!(msg.contains("INFY"));
        assert!(msg.contains("12"));
        assert!(msg.contains("10"));
    }
}
