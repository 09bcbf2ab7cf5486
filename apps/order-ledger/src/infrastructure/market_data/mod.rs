//! Market Data Adapters
//!
//! Implementations of the quote source port.

mod static_quotes;

pub use static_quotes::StaticQuoteSource;
