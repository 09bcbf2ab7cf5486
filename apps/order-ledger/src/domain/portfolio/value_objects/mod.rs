//! Portfolio value objects.

mod summary;
mod valuation;

pub use summary::{PortfolioSummary, StockPerformance};
pub use valuation::{PositionValuation, ValuedPosition};
