//! Refresh Quotes Use Case

use std::sync::Arc;

use futures::future::join_all;

use crate::application::ports::QuoteSourcePort;
use crate::domain::instrument::InstrumentRepository;
use crate::domain::shared::Symbol;
use crate::error::EngineError;

/// Outcome of one refresh pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteRefreshReport {
    /// Symbols whose catalog price was replaced.
    pub updated: Vec<Symbol>,
    /// Symbols that kept their previous price.
    pub unchanged: Vec<Symbol>,
}

/// Use case for pulling prices from the quote source into the catalog.
pub struct RefreshQuotesUseCase<I, Q>
where
    I: InstrumentRepository,
    Q: QuoteSourcePort,
{
    instruments: Arc<I>,
    quotes: Arc<Q>,
}

impl<I, Q> RefreshQuotesUseCase<I, Q>
where
    I: InstrumentRepository,
    Q: QuoteSourcePort,
{
    /// Create a new RefreshQuotesUseCase.
    pub const fn new(instruments: Arc<I>, quotes: Arc<Q>) -> Self {
        Self { instruments, quotes }
    }

    /// Query the quote source for every symbol concurrently and store the
    /// prices it returns.
    ///
    /// A missing quote or a quote-source failure leaves the previous price
    /// in place.
    ///
    /// # Errors
    ///
    /// `INTERNAL_FAILURE` when the catalog cannot be written.
    pub async fn execute(&self, symbols: &[Symbol]) -> Result<QuoteRefreshReport, EngineError> {
        let lookups = symbols.iter().map(|symbol| async move {
            let quote = self.quotes.current_price(symbol).await;
            (symbol, quote)
        });

        let mut report = QuoteRefreshReport::default();
        for (symbol, quote) in join_all(lookups).await {
            match quote {
                Ok(Some(price)) if price.validate_as_price("price").is_ok() => {
                    if self.instruments.update_price(symbol, price).await? {
                        report.updated.push(symbol.clone());
                    } else {
                        tracing::debug!(symbol = %symbol, "Quote for unknown instrument ignored");
                        report.unchanged.push(symbol.clone());
                    }
                }
                Ok(Some(price)) => {
                    tracing::warn!(symbol = %symbol, price = %price, "Ignoring out-of-range quote");
                    report.unchanged.push(symbol.clone());
                }
                Ok(None) => {
                    tracing::debug!(symbol = %symbol, "No quote available, keeping last price");
                    report.unchanged.push(symbol.clone());
                }
                Err(e) => {
                    tracing::warn!(symbol = %symbol, error = %e, "Quote lookup failed, keeping last price");
                    report.unchanged.push(symbol.clone());
                }
            }
        }

        Ok(report)
    }

    /// Refresh every active instrument in the catalog.
    ///
    /// # Errors
    ///
    /// `INTERNAL_FAILURE` when the catalog cannot be read or written.
    pub async fn refresh_active(&self) -> Result<QuoteRefreshReport, EngineError> {
        let symbols: Vec<Symbol> = self
            .instruments
            .list_active()
            .await?
            .iter()
            .map(|instrument| instrument.symbol().clone())
            .collect();

        let report = self.execute(&symbols).await?;
        tracing::debug!(
            updated = report.updated.len(),
            unchanged = report.unchanged.len(),
            "Quote refresh pass finished"
        );
        Ok(report)
    }
}
