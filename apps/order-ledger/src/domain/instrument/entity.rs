//! Instrument reference data.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{Money, Symbol, Timestamp};

/// A tradeable instrument with its last known price.
///
/// Owned by an external catalog; the engine reads a snapshot per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    symbol: Symbol,
    name: String,
    current_price: Option<Money>,
    is_active: bool,
    price_updated_at: Option<Timestamp>,
}

impl Instrument {
    /// Create an active instrument.
    #[must_use]
    pub fn new(symbol: Symbol, name: impl Into<String>, current_price: Option<Money>) -> Self {
        Self {
            symbol,
            name: name.into(),
            current_price,
            is_active: true,
            price_updated_at: current_price.map(|_| Timestamp::now()),
        }
    }

    /// Builder-style toggle of the tradeable flag.
    #[must_use]
    pub const fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Get the symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Get the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last known price, `None` when never quoted.
    #[must_use]
    pub const fn current_price(&self) -> Option<Money> {
        self.current_price
    }

    /// Whether orders may be placed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// When the price was last written.
    #[must_use]
    pub const fn price_updated_at(&self) -> Option<Timestamp> {
        self.price_updated_at
    }

    /// Record a fresh quote.
    pub fn update_price(&mut self, price: Money) {
        self.current_price = Some(price);
        self.price_updated_at = Some(Timestamp::now());
    }
}
