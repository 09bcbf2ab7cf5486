//! Portfolio Use Cases
//!
//! On-demand valuation of an account's positions at the latest catalog
//! prices, and the persisted mark-to-market refresh.

use std::sync::Arc;

use crate::application::dto::{PortfolioSummaryView, PositionView, StockPerformanceView};
use crate::application::ports::LedgerStore;
use crate::application::services::AccountLocks;
use crate::application::use_cases::support::{latest_prices, load_account};
use crate::domain::instrument::InstrumentRepository;
use crate::domain::ledger::Account;
use crate::domain::portfolio::{PortfolioSummary, Position, StockPerformance, ValuedPosition};
use crate::domain::shared::AccountId;
use crate::error::EngineError;

/// Portfolio reads and the mark-to-market refresh.
pub struct PortfolioUseCase<S, I>
where
    S: LedgerStore,
    I: InstrumentRepository,
{
    store: Arc<S>,
    instruments: Arc<I>,
    locks: Arc<AccountLocks>,
}

impl<S, I> PortfolioUseCase<S, I>
where
    S: LedgerStore,
    I: InstrumentRepository,
{
    /// Create a new PortfolioUseCase.
    pub const fn new(store: Arc<S>, instruments: Arc<I>, locks: Arc<AccountLocks>) -> Self {
        Self {
            store,
            instruments,
            locks,
        }
    }

    /// Positions holding shares, valued at the latest prices.
    ///
    /// Nothing is persisted.
    ///
    /// # Errors
    ///
    /// `NOT_FOUND` for an unknown account.
    pub async fn get_portfolio(&self, account_id: &AccountId) -> Result<Vec<PositionView>, EngineError> {
        let (_, holdings) = self.valued_holdings(account_id).await?;
        Ok(holdings
            .iter()
            .filter(|h| h.position.is_open())
            .map(PositionView::from_valued)
            .collect())
    }

    /// Totals across every position, closed ones included for realized P&L.
    ///
    /// # Errors
    ///
    /// `NOT_FOUND` for an unknown account.
    pub async fn get_portfolio_summary(
        &self,
        account_id: &AccountId,
    ) -> Result<PortfolioSummaryView, EngineError> {
        let (account, holdings) = self.valued_holdings(account_id).await?;
        Ok(PortfolioSummaryView::from(&PortfolioSummary::compute(
            &account, &holdings,
        )))
    }

    /// Return breakdown per symbol that is held or has realized P&L.
    ///
    /// # Errors
    ///
    /// `NOT_FOUND` for an unknown account.
    pub async fn get_stock_performance(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<StockPerformanceView>, EngineError> {
        let (_, holdings) = self.valued_holdings(account_id).await?;
        Ok(holdings
            .iter()
            .filter_map(StockPerformance::from_holding)
            .map(|perf| StockPerformanceView::from(&perf))
            .collect())
    }

    /// Recompute and persist current value and unrealized P&L of every
    /// open position of the account.
    ///
    /// # Errors
    ///
    /// `NOT_FOUND` for an unknown account, `INTERNAL_FAILURE` when the
    /// refreshed rows cannot be saved.
    pub async fn refresh_portfolio(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<PositionView>, EngineError> {
        let _guard = self.locks.acquire(account_id).await;

        let (_, holdings) = self.valued_holdings(account_id).await?;
        let refreshed: Vec<Position> = holdings
            .iter()
            .filter(|h| h.position.is_open())
            .map(|h| {
                let mut position = h.position.clone();
                position.apply_valuation(&h.valuation);
                position
            })
            .collect();

        self.store.save_positions(&refreshed).await?;
        tracing::info!(
            account_id = %account_id,
            positions = refreshed.len(),
            "Portfolio marked to market"
        );

        Ok(holdings
            .iter()
            .filter(|h| h.position.is_open())
            .map(PositionView::from_valued)
            .collect())
    }

    /// The account and every stored position valued at the latest prices,
    /// ordered by symbol.
    async fn valued_holdings(
        &self,
        account_id: &AccountId,
    ) -> Result<(Account, Vec<ValuedPosition>), EngineError> {
        let account = load_account(&*self.store, account_id).await?;
        let mut positions = self.store.find_positions(account_id).await?;
        positions.sort_by(|a, b| a.symbol().cmp(b.symbol()));

        let prices = latest_prices(
            &*self.instruments,
            positions.iter().map(|p| p.symbol().clone()),
        )
        .await?;

        let holdings = positions
            .into_iter()
            .map(|position| {
                let price = prices.get(position.symbol()).copied().flatten();
                ValuedPosition::at_price(position, price)
            })
            .collect();

        Ok((account, holdings))
    }
}
