//! Static quote source.
//!
//! Serves prices from a table held in memory. The table is seeded from the
//! configured instruments and can be moved by hand, which stands in for a
//! real price provider in tests and local runs.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::application::ports::{QuoteSourceError, QuoteSourcePort};
use crate::config::InstrumentSeed;
use crate::domain::shared::{Money, Symbol};

/// Quote source backed by a fixed price table.
#[derive(Debug, Default)]
pub struct StaticQuoteSource {
    prices: RwLock<HashMap<Symbol, Money>>,
}

impl StaticQuoteSource {
    /// Create an empty quote source. Every lookup returns no price.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Quote source serving the seeded price of every instrument that has one.
    #[must_use]
    pub fn from_seeds(seeds: &[InstrumentSeed]) -> Self {
        let source = Self::new();
        for seed in seeds {
            if let Some(price) = seed.price {
                source.set_price(&Symbol::new(&seed.symbol), Money::new(price));
            }
        }
        source
    }

    /// Set the price for a symbol.
    pub fn set_price(&self, symbol: &Symbol, price: Money) {
        self.prices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(symbol.clone(), price);
    }

    /// Stop quoting a symbol.
    pub fn clear_price(&self, symbol: &Symbol) {
        self.prices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(symbol);
    }
}

#[async_trait]
impl QuoteSourcePort for StaticQuoteSource {
    async fn current_price(&self, symbol: &Symbol) -> Result<Option<Money>, QuoteSourceError> {
        let prices = self
            .prices
            .read()
            .map_err(|_| QuoteSourceError::ConnectionError {
                message: "price table lock poisoned".to_string(),
            })?;
        Ok(prices.get(symbol).copied())
    }
}
