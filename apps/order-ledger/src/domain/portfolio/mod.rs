//! Portfolio Bounded Context
//!
//! The position book: per-(account, instrument) holdings with
//! weighted-average-cost accounting, realized P&L memory for closed lots,
//! and on-demand mark-to-market valuation.

pub mod aggregate;
pub mod errors;
pub mod repository;
pub mod value_objects;

pub use aggregate::Position;
pub use errors::PositionError;
pub use repository::PositionRepository;
pub use value_objects::{PortfolioSummary, PositionValuation, StockPerformance, ValuedPosition};
