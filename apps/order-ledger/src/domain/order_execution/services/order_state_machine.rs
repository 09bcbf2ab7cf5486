//! Order State Machine Service
//!
//! Validates order lifecycle transitions.

use crate::domain::order_execution::errors::OrderError;
use crate::domain::order_execution::value_objects::OrderStatus;

/// Order State Machine for validating transitions.
///
/// ```text
/// PENDING -> OPEN | COMPLETE | CANCELLED | REJECTED
/// OPEN    -> PARTIAL | COMPLETE | CANCELLED | REJECTED
/// PARTIAL -> COMPLETE
/// ```
pub struct OrderStateMachine;

impl OrderStateMachine {
    /// Check if a state transition is valid.
    #[must_use]
    pub const fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        matches!(
            (from, to),
            (
                OrderStatus::Pending,
                OrderStatus::Open
                    | OrderStatus::Complete
                    | OrderStatus::Cancelled
                    | OrderStatus::Rejected
            ) | (
                OrderStatus::Open,
                OrderStatus::Partial
                    | OrderStatus::Complete
                    | OrderStatus::Cancelled
                    | OrderStatus::Rejected
            ) | (OrderStatus::Partial, OrderStatus::Complete)
        )
    }

    /// Validate a state transition.
    ///
    /// # Errors
    ///
    /// Returns error if the transition is invalid.
    pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(OrderError::InvalidStateTransition {
                from,
                to,
                reason: Self::transition_error_reason(from, to),
            })
        }
    }

    /// Get a human-readable reason for an invalid transition.
    #[must_use]
    pub fn transition_error_reason(from: OrderStatus, to: OrderStatus) -> String {
        match from {
            OrderStatus::Complete => format!("Order is already complete, cannot transition to {to}"),
            OrderStatus::Cancelled => format!("Order is cancelled, cannot transition to {to}"),
            OrderStatus::Rejected => format!("Order was rejected, cannot transition to {to}"),
            _ => format!("Invalid transition from {from} to {to}"),
        }
    }

    /// Get all valid next states from a given state.
    #[must_use]
    pub fn valid_next_states(from: OrderStatus) -> Vec<OrderStatus> {
        match from {
            OrderStatus::Pending => vec![
                OrderStatus::Open,
                OrderStatus::Complete,
                OrderStatus::Cancelled,
                OrderStatus::Rejected,
            ],
            OrderStatus::Open => vec![
                OrderStatus::Partial,
                OrderStatus::Complete,
                OrderStatus::Cancelled,
                OrderStatus::Rejected,
            ],
            OrderStatus::Partial => vec![OrderStatus::Complete],
            // Terminal states
            OrderStatus::Complete | OrderStatus::Cancelled | OrderStatus::Rejected => vec![],
        }
    }
}
