//! Ledger errors.

use std::fmt;

use crate::domain::shared::Money;

/// Errors raised by balance and margin mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The mutation would leave free margin below zero.
    InsufficientFunds {
        /// Amount the operation needed.
        required: Money,
        /// Free margin at the time of the check.
        available: Money,
    },

    /// A negative amount was passed to a mutation.
    InvalidAmount {
        /// Operation name.
        operation: &'static str,
        /// Offending amount.
        amount: Money,
    },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientFunds {
                required,
                available,
            } => {
                write!(
                    f,
                    "Insufficient funds: required {required}, available {available}"
                )
            }
            Self::InvalidAmount { operation, amount } => {
                write!(f, "Invalid amount for {operation}: {amount}")
            }
        }
    }
}

impl std::error::Error for LedgerError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn insufficient_funds_display() {
        let err = LedgerError::InsufficientFunds {
            required: Money::new(dec!(1500)),
            available: Money::new(dec!(1000)),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: required 1500.00, available 1000.00"
        );
    }

    #[test]
    fn invalid_amount_display() {
        let err = LedgerError::InvalidAmount {
            operation: "reserve",
            amount: Money::new(dec!(-1)),
        };
        assert!(err.to_string().contains("reserve"));
    }
}
