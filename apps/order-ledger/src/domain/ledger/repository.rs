//! Account Repository Trait
//!
//! Defines the persistence abstraction for accounts. Balance changes that
//! belong to an order execution are written through the unit of work, not
//! through this trait.

use async_trait::async_trait;

use super::aggregate::Account;
use crate::domain::shared::{AccountId, RepositoryError};

/// Repository trait for Account persistence.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a newly opened account.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if an account with the same ID exists.
    async fn insert_account(&self, account: &Account) -> Result<(), RepositoryError>;

    /// Find an account by ID.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_account(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError>;
}
