//! Position Repository Trait
//!
//! Reads positions and persists mark-to-market refreshes. Position changes
//! caused by an execution are written through the unit of work together with
//! the account and order.

use async_trait::async_trait;

use super::aggregate::Position;
use crate::domain::shared::{AccountId, RepositoryError, Symbol};

/// Repository trait for Position persistence.
#[async_trait]
pub trait PositionRepository: Send + Sync {
    /// Find the position of `account_id` in `symbol`.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_position(
        &self,
        account_id: &AccountId,
        symbol: &Symbol,
    ) -> Result<Option<Position>, RepositoryError>;

    /// All positions of an account, closed ones included, ordered by symbol.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_positions(&self, account_id: &AccountId)
    -> Result<Vec<Position>, RepositoryError>;

    /// Save several positions at once (insert or update).
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails; no position is written on error.
    async fn save_positions(&self, positions: &[Position]) -> Result<(), RepositoryError>;
}
