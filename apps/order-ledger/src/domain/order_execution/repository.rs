//! Order and Trade Repository Traits
//!
//! Read side of order persistence. Orders and trades are written through the
//! unit of work so they commit together with the account and position they
//! affect.

use async_trait::async_trait;

use super::aggregate::{Order, Trade};
use crate::domain::shared::{AccountId, OrderId, RepositoryError};

/// One slice of an account's orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSlice {
    /// Orders in the slice, newest first.
    pub orders: Vec<Order>,
    /// Orders the account has in total.
    pub total: usize,
}

/// Repository trait for Order reads.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Find an order by ID.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_order(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError>;

    /// Check if an order ID is taken.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn order_exists(&self, id: &OrderId) -> Result<bool, RepositoryError>;

    /// All orders of an account, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_orders(&self, account_id: &AccountId) -> Result<Vec<Order>, RepositoryError>;

    /// Up to `limit` orders of an account after skipping `offset`, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_orders_slice(
        &self,
        account_id: &AccountId,
        offset: usize,
        limit: usize,
    ) -> Result<OrderSlice, RepositoryError>;
}

/// Repository trait for Trade reads.
#[async_trait]
pub trait TradeRepository: Send + Sync {
    /// All trades of an account, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_trades(&self, account_id: &AccountId) -> Result<Vec<Trade>, RepositoryError>;
}
