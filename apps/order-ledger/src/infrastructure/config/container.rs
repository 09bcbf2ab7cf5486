//! Dependency Injection Container
//!
//! Manages creation and wiring of all application components.

use std::sync::Arc;

use crate::application::ports::{LedgerStore, NotificationPort, QuoteSourcePort};
use crate::application::services::AccountLocks;
use crate::application::use_cases::{
    AccountUseCase, CancelOrderUseCase, ExecuteOpenOrderUseCase, OrderQueriesUseCase,
    PlaceOrderUseCase, PortfolioUseCase, RefreshQuotesUseCase,
};
use crate::config::{Config, EngineSettings};
use crate::domain::instrument::{Instrument, InstrumentRepository};
use crate::domain::shared::{AccountId, Money, Quantity, Symbol};
use crate::error::EngineError;
use crate::infrastructure::market_data::StaticQuoteSource;
use crate::infrastructure::notifications::TracingNotifier;
use crate::infrastructure::persistence::{InMemoryInstrumentCatalog, InMemoryLedgerStore};
use crate::resilience::RetryPolicy;

/// Container wired with the in-process adapters.
pub type InMemoryContainer =
    Container<InMemoryLedgerStore, InMemoryInstrumentCatalog, StaticQuoteSource, TracingNotifier>;

/// Dependency injection container.
///
/// Holds all wired dependencies for the application. Every use case built
/// from one container shares the same account locks, so operations on one
/// account are serialized across use cases.
pub struct Container<S, I, Q, N>
where
    S: LedgerStore + 'static,
    I: InstrumentRepository + 'static,
    Q: QuoteSourcePort + 'static,
    N: NotificationPort + 'static,
{
    // Ports
    store: Arc<S>,
    instruments: Arc<I>,
    quotes: Arc<Q>,
    notifier: Arc<N>,

    // Shared services
    locks: Arc<AccountLocks>,
    settings: EngineSettings,
}

impl<S, I, Q, N> Container<S, I, Q, N>
where
    S: LedgerStore + 'static,
    I: InstrumentRepository + 'static,
    Q: QuoteSourcePort + 'static,
    N: NotificationPort + 'static,
{
    /// Create a new container with all dependencies.
    pub fn new(
        store: Arc<S>,
        instruments: Arc<I>,
        quotes: Arc<Q>,
        notifier: Arc<N>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            store,
            instruments,
            quotes,
            notifier,
            locks: Arc::new(AccountLocks::new()),
            settings,
        }
    }

    /// Get the ledger store.
    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    /// Get the instrument catalog.
    pub fn instruments(&self) -> Arc<I> {
        Arc::clone(&self.instruments)
    }

    /// Get the quote source.
    pub fn quotes(&self) -> Arc<Q> {
        Arc::clone(&self.quotes)
    }

    /// Get the notifier.
    pub fn notifier(&self) -> Arc<N> {
        Arc::clone(&self.notifier)
    }

    /// Engine settings the use cases are built with.
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.settings.commit_retry.to_policy()
    }

    /// Create an `AccountUseCase`.
    pub fn account_use_case(&self) -> AccountUseCase<S> {
        AccountUseCase::new(
            Arc::clone(&self.store),
            Arc::clone(&self.locks),
            Money::new(self.settings.opening_balance),
        )
    }

    /// Create a `PlaceOrderUseCase`.
    pub fn place_order_use_case(&self) -> PlaceOrderUseCase<S, I, N> {
        PlaceOrderUseCase::new(
            Arc::clone(&self.store),
            Arc::clone(&self.instruments),
            Arc::clone(&self.notifier),
            Arc::clone(&self.locks),
            self.retry_policy(),
            Quantity::new(self.settings.max_order_quantity),
        )
    }

    /// Create a `CancelOrderUseCase`.
    pub fn cancel_order_use_case(&self) -> CancelOrderUseCase<S, N> {
        CancelOrderUseCase::new(
            Arc::clone(&self.store),
            Arc::clone(&self.notifier),
            Arc::clone(&self.locks),
            self.retry_policy(),
        )
    }

    /// Create an `ExecuteOpenOrderUseCase`.
    pub fn execute_open_order_use_case(&self) -> ExecuteOpenOrderUseCase<S, N> {
        ExecuteOpenOrderUseCase::new(
            Arc::clone(&self.store),
            Arc::clone(&self.notifier),
            Arc::clone(&self.locks),
            self.retry_policy(),
        )
    }

    /// Create an `OrderQueriesUseCase`.
    pub fn order_queries_use_case(&self) -> OrderQueriesUseCase<S> {
        OrderQueriesUseCase::new(Arc::clone(&self.store), self.settings.max_page_size)
    }

    /// Create a `PortfolioUseCase`.
    pub fn portfolio_use_case(&self) -> PortfolioUseCase<S, I> {
        PortfolioUseCase::new(
            Arc::clone(&self.store),
            Arc::clone(&self.instruments),
            Arc::clone(&self.locks),
        )
    }

    /// Create a `RefreshQuotesUseCase`.
    pub fn refresh_quotes_use_case(&self) -> RefreshQuotesUseCase<I, Q> {
        RefreshQuotesUseCase::new(Arc::clone(&self.instruments), Arc::clone(&self.quotes))
    }
}

impl InMemoryContainer {
    /// Build the in-process container from configuration: seed the
    /// instrument catalog and quote table, then open the listed accounts.
    ///
    /// # Errors
    ///
    /// Returns the error of the first account that cannot be opened.
    pub async fn from_config(config: &Config) -> Result<Self, EngineError> {
        let catalog = InMemoryInstrumentCatalog::new();
        for seed in &config.instruments {
            let name = if seed.name.is_empty() {
                seed.symbol.clone()
            } else {
                seed.name.clone()
            };
            catalog.upsert(
                Instrument::new(Symbol::new(&seed.symbol), name, seed.price.map(Money::new))
                    .with_active(seed.active),
            );
        }

        let container = Self::new(
            Arc::new(InMemoryLedgerStore::new()),
            Arc::new(catalog),
            Arc::new(StaticQuoteSource::from_seeds(&config.instruments)),
            Arc::new(TracingNotifier::new()),
            config.engine.clone(),
        );

        let accounts = container.account_use_case();
        for account_id in &config.accounts {
            accounts.open_account(&AccountId::new(account_id)).await?;
        }

        tracing::info!(
            instruments = config.instruments.len(),
            accounts = config.accounts.len(),
            "Container initialized"
        );

        Ok(container)
    }
}
