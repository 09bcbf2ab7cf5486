//! Data Transfer Objects
//!
//! Views handed to the transport layer.

mod order_dto;
mod portfolio_dto;

pub use order_dto::{OrderView, Page, TradeView};
pub use portfolio_dto::{AccountView, PortfolioSummaryView, PositionView, StockPerformanceView};
