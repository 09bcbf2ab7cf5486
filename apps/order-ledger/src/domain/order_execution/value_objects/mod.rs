//! Order Execution Value Objects
//!
//! Immutable types describing an order request and its lifecycle.

mod order_status;
mod order_type;
mod reasons;
mod transaction_type;
mod validity;

pub use order_status::OrderStatus;
pub use order_type::{ExecutionMode, OrderType};
pub use reasons::{CancelReason, FieldViolation, RejectReason};
pub use transaction_type::TransactionType;
pub use validity::Validity;
