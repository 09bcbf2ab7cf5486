//! Instrument Catalog Trait
//!
//! Read-mostly access to instrument reference data. Prices are written only
//! by the quote refresh path.

use async_trait::async_trait;

use super::entity::Instrument;
use crate::domain::shared::{Money, RepositoryError, Symbol};

/// Catalog of tradeable instruments.
#[async_trait]
pub trait InstrumentRepository: Send + Sync {
    /// Find an instrument by symbol.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_instrument(&self, symbol: &Symbol)
    -> Result<Option<Instrument>, RepositoryError>;

    /// All active instruments.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn list_active(&self) -> Result<Vec<Instrument>, RepositoryError>;

    /// Store a new price for `symbol`. Returns false if the symbol is unknown.
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails.
    async fn update_price(&self, symbol: &Symbol, price: Money) -> Result<bool, RepositoryError>;
}
