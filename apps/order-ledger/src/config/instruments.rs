//! Seed data: instruments, accounts and the quote refresh loop.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One instrument loaded into the catalog at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentSeed {
    /// Ticker symbol.
    pub symbol: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Initial price; absent means no quote yet.
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Tradable flag.
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Quote refresh loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotesConfig {
    /// Seconds between refreshes of every active instrument; 0 disables.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

const fn default_active() -> bool {
    true
}

const fn default_refresh_interval_secs() -> u64 {
    60
}
