//! Order Execution Bounded Context
//!
//! Manages the order lifecycle from placement to a terminal state.
//!
//! # Key Concepts
//!
//! - **Order Aggregate**: the root entity owning status transitions
//! - **Execution mode**: MARKET executes immediately, LIMIT/SL/`SL_M` rest OPEN
//! - **Settlement**: position, cash and order status change as one unit
//! - **Domain Events**: placed, executed, cancelled and rejected

pub mod aggregate;
pub mod errors;
pub mod events;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use aggregate::{MAX_NOTES_LEN, Order, PlaceOrderCommand, Trade};
pub use errors::OrderError;
pub use events::{OrderCancelled, OrderEvent, OrderExecuted, OrderPlaced, OrderRejected};
pub use repository::{OrderRepository, OrderSlice, TradeRepository};
pub use services::{
    OrderStateMachine, PreTradeApproval, PreTradeCheck, SettledExecution, Settlement,
    SettlementError,
};
pub use value_objects::{
    CancelReason, ExecutionMode, FieldViolation, OrderStatus, OrderType, RejectReason,
    TransactionType, Validity,
};
