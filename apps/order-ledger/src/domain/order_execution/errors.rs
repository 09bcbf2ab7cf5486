//! Order execution errors.

use std::fmt;

use super::value_objects::{FieldViolation, OrderStatus};

/// Errors that can occur in order execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Invalid state transition attempted.
    InvalidStateTransition {
        /// Current order status.
        from: OrderStatus,
        /// Attempted status.
        to: OrderStatus,
        /// Reason for failure.
        reason: String,
    },

    /// Order cannot be cancelled in its current state.
    CannotCancel {
        /// Current status.
        status: OrderStatus,
    },

    /// Order request failed field validation.
    Validation {
        /// Every offending field.
        violations: Vec<FieldViolation>,
    },

    /// Order not found.
    NotFound {
        /// Order ID.
        order_id: String,
    },

    /// Duplicate order ID.
    DuplicateOrderId {
        /// Order ID.
        order_id: String,
    },
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStateTransition { from, to, reason } => {
                write!(
                    f,
                    "Invalid order state transition: {from} -> {to}: {reason}"
                )
            }
            Self::CannotCancel { status } => {
                write!(f, "Cannot cancel order in status: {status}")
            }
            Self::Validation { violations } => {
                write!(f, "Invalid order request")?;
                for (i, v) in violations.iter().enumerate() {
                    let sep = if i == 0 { ": " } else { "; " };
                    write!(f, "{sep}{v}")?;
                }
                Ok(())
            }
            Self::NotFound { order_id } => {
                write!(f, "Order not found: {order_id}")
            }
            Self::DuplicateOrderId { order_id } => {
                write!(f, "Duplicate order ID: {order_id}")
            }
        }
    }
}

impl std::error::Error for OrderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_error_invalid_state_transition_display() {
        let err = OrderError::InvalidStateTransition {
            from: OrderStatus::Complete,
            to: OrderStatus::Open,
            reason: "Order is already complete".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("COMPLETE"));
        assert!(msg.contains("OPEN"));
    }

    #[test]
    fn order_error_cannot_cancel_display() {
        let err = OrderError::CannotCancel {
            status: OrderStatus::Complete,
        };
        assert_eq!(err.to_string(), "Cannot cancel order in status: COMPLETE");
    }

    #[test]
    fn validation_error_lists_every_field() {
        let err = OrderError::Validation {
            violations: vec![
                FieldViolation::new("quantity", "must be at least 1"),
                FieldViolation::new("price", "required for LIMIT orders"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Invalid order request: quantity: must be at least 1; price: required for LIMIT orders"
        );
    }

    #[test]
    fn order_error_not_found_display() {
        let err = OrderError::NotFound {
            order_id: "ORD-1".to_string(),
        };
        assert!(err.to_string().contains("ORD-1"));
    }
}
