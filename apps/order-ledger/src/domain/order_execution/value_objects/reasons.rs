//! Reasons for order rejection and cancellation, and request field violations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{DomainError, Money, Quantity, Symbol};

/// Reason an order was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RejectReason {
    /// Machine-readable code, matching the engine error codes.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl RejectReason {
    /// Create a new reject reason.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Free margin does not cover the order.
    #[must_use]
    pub fn insufficient_funds(required: Money, available: Money) -> Self {
        Self::new(
            "INSUFFICIENT_FUNDS",
            format!("Insufficient funds: required {required}, available {available}"),
        )
    }

    /// Unreserved holdings do not cover the sale.
    #[must_use]
    pub fn insufficient_holdings(symbol: &Symbol, requested: Quantity, available: Quantity) -> Self {
        Self::new(
            "INSUFFICIENT_HOLDINGS",
            format!("Insufficient holdings in {symbol}: requested {requested}, available {available}"),
        )
    }

    /// Instrument is not tradable.
    #[must_use]
    pub fn instrument_inactive(symbol: &Symbol) -> Self {
        Self::new(
            "INSTRUMENT_INACTIVE",
            format!("Instrument {symbol} is not active for trading"),
        )
    }

    /// No price to cost the order with.
    #[must_use]
    pub fn quotes_unavailable(symbol: &Symbol) -> Self {
        Self::new(
            "QUOTES_UNAVAILABLE",
            format!("No current price available for {symbol}"),
        )
    }

    /// Settlement of a resting order failed.
    #[must_use]
    pub fn settlement_failed(message: impl Into<String>) -> Self {
        Self::new("SETTLEMENT_FAILED", message)
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Reason for order cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CancelReason {
    /// Cancellation code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl CancelReason {
    /// Create a new cancel reason.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Cancelled by the account owner.
    #[must_use]
    pub fn user_requested() -> Self {
        Self::new("USER_REQUESTED", "Cancelled by user")
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// One invalid field in an order request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Request field name.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl FieldViolation {
    /// Create a new violation.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<DomainError> for FieldViolation {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidValue { field, message } => Self { field, message },
            DomainError::InvariantViolation { ref aggregate, .. } => {
                Self::new(aggregate.clone(), err.to_string())
            }
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
