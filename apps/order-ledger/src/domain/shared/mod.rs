//! Shared Domain Types
//!
//! Value objects and errors shared across bounded contexts.

pub mod errors;
pub mod value_objects;

pub use errors::{DomainError, RepositoryError};
pub use value_objects::{
    AVERAGE_COST_SCALE, AccountId, DISPLAY_SCALE, Money, OrderId, Quantity, Symbol, TradeId,
    Timestamp,
};
