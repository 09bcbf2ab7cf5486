//! Engine error taxonomy.
//!
//! Every operation exposed to the transport layer fails with an
//! [`EngineError`]. Business-rule failures met while placing an order never
//! reach the caller this way: the order is stored REJECTED with a reason
//! instead.
//!
//! | Code | Surfaced when |
//! |------|---------------|
//! | `VALIDATION_ERROR` | Malformed request, with per-field detail |
//! | `INSUFFICIENT_FUNDS` | Free margin does not cover a BUY |
//! | `INSUFFICIENT_HOLDINGS` | Unreserved shares do not cover a SELL |
//! | `INSTRUMENT_INACTIVE` | Instrument is not tradable |
//! | `QUOTES_UNAVAILABLE` | No price to cost or execute with |
//! | `ILLEGAL_STATE_TRANSITION` | Cancel/execute on an order in the wrong state |
//! | `ACCESS_DENIED` | Order belongs to another account |
//! | `NOT_FOUND` | Unknown order, instrument or account |
//! | `INTERNAL_FAILURE` | Persistence or quote-source fault |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ledger::LedgerError;
use crate::domain::order_execution::{FieldViolation, OrderError, SettlementError};
use crate::domain::portfolio::PositionError;
use crate::domain::shared::{DomainError, RepositoryError};

/// Error codes for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad request shape.
    ValidationError,
    /// Free margin too low.
    InsufficientFunds,
    /// Holdings too low.
    InsufficientHoldings,
    /// Instrument not tradable.
    InstrumentInactive,
    /// No current price.
    QuotesUnavailable,
    /// Invalid cancel or execute attempt.
    IllegalStateTransition,
    /// Ownership violation.
    AccessDenied,
    /// Unknown order, instrument or account.
    NotFound,
    /// Fault unrelated to business rules.
    InternalFailure,
}

impl ErrorCode {
    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InsufficientFunds => "INSUFFICIENT_FUNDS",
            Self::InsufficientHoldings => "INSUFFICIENT_HOLDINGS",
            Self::InstrumentInactive => "INSTRUMENT_INACTIVE",
            Self::QuotesUnavailable => "QUOTES_UNAVAILABLE",
            Self::IllegalStateTransition => "ILLEGAL_STATE_TRANSITION",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::NotFound => "NOT_FOUND",
            Self::InternalFailure => "INTERNAL_FAILURE",
        }
    }

    /// Returns true for failures recovered by rejecting the order.
    #[must_use]
    pub const fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::InsufficientFunds
                | Self::InsufficientHoldings
                | Self::InstrumentInactive
                | Self::QuotesUnavailable
                | Self::IllegalStateTransition
        )
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A rich error with context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct EngineError {
    code: ErrorCode,
    message: String,
    context: Vec<(String, String)>,
    violations: Vec<FieldViolation>,
}

impl EngineError {
    /// Create a new engine error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
            violations: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Field violations of a `VALIDATION_ERROR`.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Convert to a serializable response body.
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code.reason().to_string(),
            message: self.message.clone(),
            details: self.context.iter().cloned().collect(),
            violations: self.violations.clone(),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.reason(), self.message)
    }
}

/// Serializable error body for the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Additional details.
    pub details: HashMap<String, String>,
    /// Per-field violations, empty unless `code` is `VALIDATION_ERROR`.
    pub violations: Vec<FieldViolation>,
}

/// Convenience constructors for common errors.
impl EngineError {
    /// Request failed validation.
    #[must_use]
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        let message = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            violations,
            ..Self::new(ErrorCode::ValidationError, message)
        }
    }

    /// Single-field validation failure.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::validation(vec![FieldViolation::new(field, message)])
    }

    /// Order not found.
    #[must_use]
    pub fn order_not_found(order_id: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("Order {order_id} not found"))
            .with_context("order_id", order_id)
    }

    /// Account not found.
    #[must_use]
    pub fn account_not_found(account_id: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("Account {account_id} not found"))
            .with_context("account_id", account_id)
    }

    /// Instrument not found.
    #[must_use]
    pub fn instrument_not_found(symbol: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("Instrument {symbol} not found"))
            .with_context("symbol", symbol)
    }

    /// Order read or changed by an account that did not place it.
    #[must_use]
    pub fn access_denied(order_id: &str) -> Self {
        Self::new(
            ErrorCode::AccessDenied,
            format!("Order {order_id} belongs to another account"),
        )
        .with_context("order_id", order_id)
    }

    /// Internal failure.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalFailure, message)
    }
}

impl From<OrderError> for EngineError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::Validation { violations } => Self::validation(violations),
            OrderError::InvalidStateTransition { .. } | OrderError::CannotCancel { .. } => {
                Self::new(ErrorCode::IllegalStateTransition, e.to_string())
            }
            OrderError::NotFound { ref order_id } => Self::order_not_found(order_id),
            OrderError::DuplicateOrderId { .. } => Self::internal(e.to_string()),
        }
    }
}

impl From<RepositoryError> for EngineError {
    fn from(e: RepositoryError) -> Self {
        Self::internal(e.to_string())
    }
}

impl From<DomainError> for EngineError {
    fn from(e: DomainError) -> Self {
        Self::validation(vec![FieldViolation::from(e)])
    }
}

impl From<LedgerError> for EngineError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InsufficientFunds { .. } => {
                Self::new(ErrorCode::InsufficientFunds, e.to_string())
            }
            LedgerError::InvalidAmount { .. } => Self::internal(e.to_string()),
        }
    }
}

impl From<PositionError> for EngineError {
    fn from(e: PositionError) -> Self {
        match e {
            PositionError::InsufficientHoldings { .. } => {
                Self::new(ErrorCode::InsufficientHoldings, e.to_string())
            }
            PositionError::QuantityOverflow { .. } | PositionError::InvalidTrade { .. } => {
                Self::internal(e.to_string())
            }
        }
    }
}

impl From<SettlementError> for EngineError {
    fn from(e: SettlementError) -> Self {
        match e {
            SettlementError::Position(e) => e.into(),
            SettlementError::Ledger(e) => e.into(),
            SettlementError::Order(e) => e.into(),
        }
    }
}
