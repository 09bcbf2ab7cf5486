// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Order Ledger - Rust Core Library
//!
//! Order-execution and portfolio-ledger engine for a retail trading
//! platform. Accounts place BUY and SELL orders for listed instruments;
//! the engine checks cash and holdings, executes MARKET orders at once,
//! rests LIMIT and stop orders with funds or shares blocked, and keeps
//! balances and average-cost positions consistent under concurrent use.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic (aggregates, value objects, domain events)
//!   - `ledger`: Account balances and blocked margin
//!   - `portfolio`: Positions, valuations, summaries
//!   - `instrument`: Instrument reference data
//!   - `order_execution`: Order aggregate, trades, pre-trade checks, settlement
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interfaces for persistence, quotes and notifications
//!   - `services`: Per-account locks, retried atomic commit
//!   - `use_cases`: `PlaceOrder`, `CancelOrder`, `ExecuteOpenOrder`, queries, portfolio
//!   - `dto`: Views returned to callers
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: In-memory ledger store and instrument catalog
//!   - `market_data`: Static quote source
//!   - `notifications`: Tracing-backed event dispatch
//!   - `config`: Dependency injection container

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting Modules
// =============================================================================

/// YAML configuration loading and validation.
pub mod config;

/// Engine error taxonomy returned by every use case.
pub mod error;

/// Metrics and structured logging.
pub mod observability;

/// Retry policy for ledger commits.
pub mod resilience;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::order_execution::{
    Order, OrderStatus, OrderType, PlaceOrderCommand, Trade, TransactionType, Validity,
};
pub use domain::shared::{AccountId, Money, OrderId, Quantity, Symbol, Timestamp, TradeId};

// Application re-exports
pub use application::dto::{
    AccountView, OrderView, Page, PortfolioSummaryView, PositionView, StockPerformanceView,
    TradeView,
};
pub use application::use_cases::{
    AccountUseCase, CancelOrderUseCase, ExecuteOpenOrderUseCase, OrderQueriesUseCase,
    PlaceOrderUseCase, PortfolioUseCase, QuoteRefreshReport, RefreshQuotesUseCase,
};

// Infrastructure re-exports
pub use infrastructure::config::{Container, InMemoryContainer};
pub use infrastructure::market_data::StaticQuoteSource;
pub use infrastructure::notifications::TracingNotifier;
pub use infrastructure::persistence::{InMemoryInstrumentCatalog, InMemoryLedgerStore};

pub use error::{EngineError, ErrorCode};
