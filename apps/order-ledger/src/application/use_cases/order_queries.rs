//! Order and Trade Queries

use std::sync::Arc;

use crate::application::dto::{OrderView, Page, TradeView};
use crate::application::ports::LedgerStore;
use crate::application::use_cases::support::{load_account, load_owned_order};
use crate::domain::shared::{AccountId, OrderId};
use crate::error::EngineError;

/// Read-only order and trade listings for one account.
pub struct OrderQueriesUseCase<S: LedgerStore> {
    store: Arc<S>,
    max_page_size: usize,
}

impl<S: LedgerStore> OrderQueriesUseCase<S> {
    /// Create a new OrderQueriesUseCase.
    pub const fn new(store: Arc<S>, max_page_size: usize) -> Self {
        Self {
            store,
            max_page_size,
        }
    }

    /// One order, readable only by the account that placed it.
    ///
    /// # Errors
    ///
    /// `NOT_FOUND` for unknown ids, `ACCESS_DENIED` for foreign orders.
    pub async fn get_order(
        &self,
        order_id: &OrderId,
        account_id: &AccountId,
    ) -> Result<OrderView, EngineError> {
        let order = load_owned_order(&*self.store, order_id, account_id).await?;
        Ok(OrderView::from_order(&order))
    }

    /// Every order of the account, newest first.
    ///
    /// # Errors
    ///
    /// `NOT_FOUND` for an unknown account.
    pub async fn list_orders(&self, account_id: &AccountId) -> Result<Vec<OrderView>, EngineError> {
        load_account(&*self.store, account_id).await?;
        let orders = self.store.find_orders(account_id).await?;
        Ok(orders.iter().map(OrderView::from_order).collect())
    }

    /// One page of the account's orders, newest first.
    ///
    /// `page` is 0-based; `size` must be within `1..=max_page_size`.
    ///
    /// # Errors
    ///
    /// `VALIDATION_ERROR` for an out-of-range size, `NOT_FOUND` for an
    /// unknown account.
    pub async fn list_orders_page(
        &self,
        account_id: &AccountId,
        page: usize,
        size: usize,
    ) -> Result<Page<OrderView>, EngineError> {
        if size == 0 || size > self.max_page_size {
            return Err(EngineError::invalid_field(
                "size",
                format!("must be between 1 and {}", self.max_page_size),
            ));
        }
        let offset = page
            .checked_mul(size)
            .ok_or_else(|| EngineError::invalid_field("page", "is out of range"))?;

        load_account(&*self.store, account_id).await?;
        let slice = self
            .store
            .find_orders_slice(account_id, offset, size)
            .await?;

        Ok(Page::new(
            slice.orders.iter().map(OrderView::from_order).collect(),
            page,
            size,
            slice.total,
        ))
    }

    /// Every execution of the account, newest first.
    ///
    /// # Errors
    ///
    /// `NOT_FOUND` for an unknown account.
    pub async fn list_trades(&self, account_id: &AccountId) -> Result<Vec<TradeView>, EngineError> {
        load_account(&*self.store, account_id).await?;
        let trades = self.store.find_trades(account_id).await?;
        Ok(trades.iter().map(TradeView::from_trade).collect())
    }
}
