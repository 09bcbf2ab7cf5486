//! Use Cases
//!
//! Application-specific business rules that orchestrate domain logic.

mod account;
mod cancel_order;
mod execute_open_order;
mod order_queries;
mod place_order;
mod portfolio;
mod refresh_quotes;
mod support;

pub use account::AccountUseCase;
pub use cancel_order::CancelOrderUseCase;
pub use execute_open_order::ExecuteOpenOrderUseCase;
pub use order_queries::OrderQueriesUseCase;
pub use place_order::PlaceOrderUseCase;
pub use portfolio::PortfolioUseCase;
pub use refresh_quotes::{QuoteRefreshReport, RefreshQuotesUseCase};
