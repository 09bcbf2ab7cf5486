//! Order Aggregate
//!
//! The Order aggregate is the root entity for order lifecycle management;
//! a Trade records each execution.

mod order;
mod trade;

pub use order::{MAX_NOTES_LEN, Order, PlaceOrderCommand};
pub use trade::Trade;
