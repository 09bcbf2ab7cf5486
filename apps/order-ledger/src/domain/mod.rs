//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Aggregates**: Consistency boundaries with invariants
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Events**: Records of order state transitions
//! - **Domain Services**: Stateless business logic
//! - **Repository Traits**: Persistence abstractions (implemented in adapters)
//!
//! # Bounded Contexts
//!
//! - [`ledger`]: Per-account cash balance and blocked margin
//! - [`portfolio`]: Per-(account, instrument) positions with average-cost accounting
//! - [`instrument`]: Tradeable instrument reference data and last known price
//! - [`order_execution`]: Order lifecycle, pre-trade checks and settlement

pub mod instrument;
pub mod ledger;
pub mod order_execution;
pub mod portfolio;
pub mod shared;
