//! In-memory ledger store and instrument catalog.
//!
//! All ledger tables sit behind one lock so a commit is applied as a single
//! write. Suitable for tests and single-process deployments.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::application::ports::{LedgerChangeSet, OrderWrite, UnitOfWorkPort};
use crate::domain::instrument::{Instrument, InstrumentRepository};
use crate::domain::ledger::{Account, AccountRepository};
use crate::domain::order_execution::{Order, OrderRepository, OrderSlice, Trade, TradeRepository};
use crate::domain::portfolio::{Position, PositionRepository};
use crate::domain::shared::{AccountId, Money, OrderId, RepositoryError, Symbol};

// ============================================================================
// Tables
// ============================================================================

#[derive(Debug)]
struct StoredOrder {
    seq: u64,
    order: Order,
}

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<AccountId, Account>,
    positions: BTreeMap<(AccountId, Symbol), Position>,
    orders: HashMap<OrderId, StoredOrder>,
    trades: Vec<Trade>,
    next_seq: u64,
}

impl Tables {
    fn check(&self, changes: &LedgerChangeSet) -> Result<(), RepositoryError> {
        match &changes.order {
            OrderWrite::Insert(order) if self.orders.contains_key(order.id()) => {
                Err(RepositoryError::Conflict {
                    entity: "order".to_string(),
                    id: order.id().to_string(),
                })
            }
            OrderWrite::Update(order) if !self.orders.contains_key(order.id()) => {
                Err(RepositoryError::Corrupted {
                    message: format!("update of unknown order {}", order.id()),
                })
            }
            _ => Ok(()),
        }
    }

    fn apply(&mut self, changes: &LedgerChangeSet) {
        if let Some(account) = &changes.account {
            self.accounts.insert(account.id().clone(), account.clone());
        }
        if let Some(position) = &changes.position {
            self.put_position(position);
        }

        let mut order = changes.order.order().clone();
        // Events are published by the caller after commit, never stored.
        let _ = order.drain_events();
        let seq = match self.orders.get(order.id()) {
            Some(existing) => existing.seq,
            None => {
                self.next_seq += 1;
                self.next_seq
            }
        };
        self.orders.insert(order.id().clone(), StoredOrder { seq, order });

        if let Some(trade) = &changes.trade {
            self.trades.push(trade.clone());
        }
    }

    fn put_position(&mut self, position: &Position) {
        self.positions.insert(
            (position.account_id().clone(), position.symbol().clone()),
            position.clone(),
        );
    }

    fn orders_newest_first(&self, account_id: &AccountId) -> Vec<&StoredOrder> {
        let mut orders: Vec<&StoredOrder> = self
            .orders
            .values()
            .filter(|stored| stored.order.account_id() == account_id)
            .collect();
        orders.sort_by(|a, b| b.seq.cmp(&a.seq));
        orders
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct CommitFaults {
    passes: u32,
    failures: u32,
}

// ============================================================================
// Ledger Store
// ============================================================================

/// In-memory implementation of every ledger repository plus the unit of work.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    tables: RwLock<Tables>,
    faults: Mutex<CommitFaults>,
}

impl InMemoryLedgerStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a change set directly, bypassing conflict checks and injected
    /// faults. Used to load fixtures.
    pub fn seed(&self, changes: &LedgerChangeSet) {
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(changes);
    }

    /// Let the next `passes` commits succeed, then fail the following
    /// `failures` commits with [`RepositoryError::Unavailable`].
    pub fn fail_commits_after(&self, passes: u32, failures: u32) {
        *self.faults.lock().unwrap_or_else(PoisonError::into_inner) =
            CommitFaults { passes, failures };
    }

    /// Number of stored orders.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .orders
            .len()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, RepositoryError> {
        self.tables.read().map_err(|_| RepositoryError::Corrupted {
            message: "ledger lock poisoned".to_string(),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, RepositoryError> {
        self.tables.write().map_err(|_| RepositoryError::Corrupted {
            message: "ledger lock poisoned".to_string(),
        })
    }

    fn injected_fault(&self) -> Option<RepositoryError> {
        let mut faults = self.faults.lock().unwrap_or_else(PoisonError::into_inner);
        if faults.passes > 0 {
            faults.passes -= 1;
            None
        } else if faults.failures > 0 {
            faults.failures -= 1;
            Some(RepositoryError::Unavailable {
                message: "injected commit failure".to_string(),
            })
        } else {
            None
        }
    }
}

#[async_trait]
impl UnitOfWorkPort for InMemoryLedgerStore {
    async fn commit(&self, changes: &LedgerChangeSet) -> Result<(), RepositoryError> {
        if let Some(fault) = self.injected_fault() {
            return Err(fault);
        }

        let mut tables = self.write()?;
        tables.check(changes)?;
        tables.apply(changes);
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for InMemoryLedgerStore {
    async fn insert_account(&self, account: &Account) -> Result<(), RepositoryError> {
        let mut tables = self.write()?;
        if tables.accounts.contains_key(account.id()) {
            return Err(RepositoryError::Conflict {
                entity: "account".to_string(),
                id: account.id().to_string(),
            });
        }
        tables.accounts.insert(account.id().clone(), account.clone());
        Ok(())
    }

    async fn find_account(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(self.read()?.accounts.get(id).cloned())
    }
}

#[async_trait]
impl PositionRepository for InMemoryLedgerStore {
    async fn find_position(
        &self,
        account_id: &AccountId,
        symbol: &Symbol,
    ) -> Result<Option<Position>, RepositoryError> {
        Ok(self
            .read()?
            .positions
            .get(&(account_id.clone(), symbol.clone()))
            .cloned())
    }

    async fn find_positions(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<Position>, RepositoryError> {
        Ok(self
            .read()?
            .positions
            .iter()
            .filter(|((owner, _), _)| owner == account_id)
            .map(|(_, position)| position.clone())
            .collect())
    }

    async fn save_positions(&self, positions: &[Position]) -> Result<(), RepositoryError> {
        let mut tables = self.write()?;
        for position in positions {
            tables.put_position(position);
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryLedgerStore {
    async fn find_order(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.read()?.orders.get(id).map(|stored| stored.order.clone()))
    }

    async fn order_exists(&self, id: &OrderId) -> Result<bool, RepositoryError> {
        Ok(self.read()?.orders.contains_key(id))
    }

    async fn find_orders(&self, account_id: &AccountId) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .read()?
            .orders_newest_first(account_id)
            .into_iter()
            .map(|stored| stored.order.clone())
            .collect())
    }

    async fn find_orders_slice(
        &self,
        account_id: &AccountId,
        offset: usize,
        limit: usize,
    ) -> Result<OrderSlice, RepositoryError> {
        let tables = self.read()?;
        let all = tables.orders_newest_first(account_id);
        Ok(OrderSlice {
            total: all.len(),
            orders: all
                .into_iter()
                .skip(offset)
                .take(limit)
                .map(|stored| stored.order.clone())
                .collect(),
        })
    }
}

#[async_trait]
impl TradeRepository for InMemoryLedgerStore {
    async fn find_trades(&self, account_id: &AccountId) -> Result<Vec<Trade>, RepositoryError> {
        Ok(self
            .read()?
            .trades
            .iter()
            .rev()
            .filter(|trade| trade.account_id() == account_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Instrument Catalog
// ============================================================================

/// In-memory instrument catalog.
#[derive(Debug, Default)]
pub struct InMemoryInstrumentCatalog {
    instruments: RwLock<HashMap<Symbol, Instrument>>,
}

impl InMemoryInstrumentCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an instrument.
    pub fn upsert(&self, instrument: Instrument) {
        self.instruments
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(instrument.symbol().clone(), instrument);
    }

    /// Snapshot of one instrument.
    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> Option<Instrument> {
        self.instruments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(symbol)
            .cloned()
    }

    /// Number of instruments in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Symbol, Instrument>>, RepositoryError> {
        self.instruments.read().map_err(|_| RepositoryError::Corrupted {
            message: "catalog lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl InstrumentRepository for InMemoryInstrumentCatalog {
    async fn find_instrument(
        &self,
        symbol: &Symbol,
    ) -> Result<Option<Instrument>, RepositoryError> {
        Ok(self.read()?.get(symbol).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Instrument>, RepositoryError> {
        let mut active: Vec<Instrument> = self
            .read()?
            .values()
            .filter(|instrument| instrument.is_active())
            .cloned()
            .collect();
        active.sort_by(|a, b| a.symbol().cmp(b.symbol()));
        Ok(active)
    }

    async fn update_price(&self, symbol: &Symbol, price: Money) -> Result<bool, RepositoryError> {
        let mut instruments = self.instruments.write().map_err(|_| RepositoryError::Corrupted {
            message: "catalog lock poisoned".to_string(),
        })?;
        Ok(instruments
            .get_mut(symbol)
            .map(|instrument| instrument.update_price(price))
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_execution::{OrderType, PlaceOrderCommand, TransactionType, Validity};
    use crate::domain::shared::{Quantity, TradeId};
    use rust_decimal_macros::dec;

    fn acct() -> AccountId {
        AccountId::new("acct-1")
    }

    fn order(id: &str) -> Order {
        Order::new(
            OrderId::new(id),
            acct(),
            PlaceOrderCommand {
                symbol: Symbol::new("INFY"),
                transaction_type: TransactionType::Buy,
                order_type: OrderType::Market,
                quantity: Quantity::new(1),
                price: None,
                trigger_price: None,
                validity: Validity::default(),
                disclosed_quantity: None,
                notes: None,
            },
        )
    }

    #[tokio::test]
    async fn commit_writes_every_part_together() {
        let store = InMemoryLedgerStore::new();
        let mut account = Account::open(acct(), Money::new(dec!(1000))).unwrap();
        account.settle_buy(Money::new(dec!(100))).unwrap();
        let mut position = Position::open(acct(), Symbol::new("INFY"));
        position.apply_buy(Quantity::new(1), Money::new(dec!(100))).unwrap();
        let mut placed = order("ORD-1");
        placed
            .complete(Money::new(dec!(100)), TradeId::new("TRD-1"))
            .unwrap();
        let trade = Trade::record(TradeId::new("TRD-1"), &placed, Money::new(dec!(100)));

        store
            .commit(
                &LedgerChangeSet::order_only(OrderWrite::Insert(placed))
                    .with_account(account.clone())
                    .with_position(position.clone())
                    .with_trade(trade),
            )
            .await
            .unwrap();

        assert_eq!(store.find_account(&acct()).await.unwrap(), Some(account));
        assert_eq!(store.find_positions(&acct()).await.unwrap(), vec![position]);
        assert_eq!(store.find_trades(&acct()).await.unwrap().len(), 1);
        let stored = store.find_order(&OrderId::new("ORD-1")).await.unwrap().unwrap();
        assert!(stored.pending_events().is_empty());
    }

    #[tokio::test]
    async fn duplicate_insert_conflicts_and_writes_nothing() {
        let store = InMemoryLedgerStore::new();
        store.seed(&LedgerChangeSet::order_only(OrderWrite::Insert(order("ORD-1"))));
        let account = Account::open(acct(), Money::new(dec!(5))).unwrap();

        let err = store
            .commit(
                &LedgerChangeSet::order_only(OrderWrite::Insert(order("ORD-1")))
                    .with_account(account),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict { .. }));
        assert_eq!(store.find_account(&acct()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_keeps_insertion_position() {
        let store = InMemoryLedgerStore::new();
        for id in ["ORD-1", "ORD-2", "ORD-3"] {
            store.seed(&LedgerChangeSet::order_only(OrderWrite::Insert(order(id))));
        }
        let mut first = order("ORD-1");
        first.open().unwrap();
        store
            .commit(&LedgerChangeSet::order_only(OrderWrite::Update(first)))
            .await
            .unwrap();

        let ids: Vec<String> = store
            .find_orders(&acct())
            .await
            .unwrap()
            .iter()
            .map(|o| o.id().to_string())
            .collect();
        assert_eq!(ids, vec!["ORD-3", "ORD-2", "ORD-1"]);

        let slice = store.find_orders_slice(&acct(), 1, 5).await.unwrap();
        assert_eq!(slice.total, 3);
        assert_eq!(slice.orders.len(), 2);
    }

    #[tokio::test]
    async fn injected_failures_follow_successes() {
        let store = InMemoryLedgerStore::new();
        store.fail_commits_after(1, 1);

        let changes = |id| LedgerChangeSet::order_only(OrderWrite::Insert(order(id)));
        assert!(store.commit(&changes("ORD-1")).await.is_ok());
        assert!(store.commit(&changes("ORD-2")).await.unwrap_err().is_transient());
        assert!(store.commit(&changes("ORD-2")).await.is_ok());
        assert_eq!(store.order_count(), 2);
    }

    #[tokio::test]
    async fn catalog_updates_only_known_symbols() {
        let catalog = InMemoryInstrumentCatalog::new();
        catalog.upsert(Instrument::new(Symbol::new("INFY"), "Infosys", None));
        catalog.upsert(Instrument::new(Symbol::new("OLD"), "Delisted", None).with_active(false));

        assert!(catalog
            .update_price(&Symbol::new("INFY"), Money::new(dec!(10)))
            .await
            .unwrap());
        assert!(!catalog
            .update_price(&Symbol::new("TCS"), Money::new(dec!(10)))
            .await
            .unwrap());
        assert_eq!(catalog.list_active().await.unwrap().len(), 1);
        assert_eq!(catalog.len(), 2);
    }
}
