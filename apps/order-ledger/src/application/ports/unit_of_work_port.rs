//! Unit of Work Port (Driven Port)
//!
//! Atomic multi-row commit spanning an account, one position, one order and
//! an optional trade. Either every row in a [`LedgerChangeSet`] is written or
//! none is.

use async_trait::async_trait;

use crate::domain::ledger::{Account, AccountRepository};
use crate::domain::order_execution::{Order, OrderRepository, Trade, TradeRepository};
use crate::domain::portfolio::{Position, PositionRepository};
use crate::domain::shared::RepositoryError;

/// How the order row is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderWrite {
    /// First write; fails with `Conflict` if the id is taken.
    Insert(Order),
    /// Overwrite of an existing order.
    Update(Order),
}

impl OrderWrite {
    /// The order being written.
    #[must_use]
    pub const fn order(&self) -> &Order {
        match self {
            Self::Insert(order) | Self::Update(order) => order,
        }
    }
}

/// Rows committed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerChangeSet {
    /// Account balances, when they changed.
    pub account: Option<Account>,
    /// Position, when it changed.
    pub position: Option<Position>,
    /// The order.
    pub order: OrderWrite,
    /// Execution record, when the order executed.
    pub trade: Option<Trade>,
}

impl LedgerChangeSet {
    /// Change set that only writes the order.
    #[must_use]
    pub const fn order_only(order: OrderWrite) -> Self {
        Self {
            account: None,
            position: None,
            order,
            trade: None,
        }
    }

    /// Attach the account row.
    #[must_use]
    pub fn with_account(mut self, account: Account) -> Self {
        self.account = Some(account);
        self
    }

    /// Attach the position row.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Attach the trade row.
    #[must_use]
    pub fn with_trade(mut self, trade: Trade) -> Self {
        self.trade = Some(trade);
        self
    }
}

/// Port for committing a change set atomically.
#[async_trait]
pub trait UnitOfWorkPort: Send + Sync {
    /// Write every row of `changes`, or none of them.
    async fn commit(&self, changes: &LedgerChangeSet) -> Result<(), RepositoryError>;
}

/// Everything the order engine reads and writes, behind one handle.
pub trait LedgerStore:
    AccountRepository + PositionRepository + OrderRepository + TradeRepository + UnitOfWorkPort
{
}

impl<T> LedgerStore for T where
    T: AccountRepository + PositionRepository + OrderRepository + TradeRepository + UnitOfWorkPort
{
}
