//! Quote Source Port (Driven Port)
//!
//! Interface for reading the latest price of an instrument.

use async_trait::async_trait;

use crate::domain::shared::{Money, Symbol};

/// Quote source error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QuoteSourceError {
    /// Connection error.
    #[error("Quote source connection error: {message}")]
    ConnectionError {
        /// Error message.
        message: String,
    },

    /// The source answered with something unusable.
    #[error("Invalid quote for {symbol}: {message}")]
    InvalidQuote {
        /// Symbol that was quoted.
        symbol: String,
        /// What was wrong with the quote.
        message: String,
    },
}

/// Port for the external quote source.
#[async_trait]
pub trait QuoteSourcePort: Send + Sync {
    /// Current price of `symbol`, or `None` when the source has no quote.
    async fn current_price(&self, symbol: &Symbol) -> Result<Option<Money>, QuoteSourceError>;
}
