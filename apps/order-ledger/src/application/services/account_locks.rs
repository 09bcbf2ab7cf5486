//! Per-account mutual exclusion.
//!
//! Every operation that reads an account's balances or positions and then
//! writes them holds that account's lock for the whole
//! validate -> reserve/settle -> persist sequence. Different accounts never
//! contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

use crate::domain::shared::AccountId;

type LockTable = Mutex<HashMap<AccountId, Arc<tokio::sync::Mutex<()>>>>;

/// Registry of one async mutex per account.
///
/// An entry lives only while some caller holds or awaits its lock, so ids
/// that are never seen again do not accumulate.
#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: Arc<LockTable>,
}

/// Guard proving the holder has exclusive access to one account.
#[derive(Debug)]
pub struct AccountGuard {
    account_id: AccountId,
    guard: Option<OwnedMutexGuard<()>>,
    table: Arc<LockTable>,
}

impl AccountGuard {
    /// The locked account.
    #[must_use]
    pub const fn account_id(&self) -> &AccountId {
        &self.account_id
    }
}

impl Drop for AccountGuard {
    fn drop(&mut self) {
        // release first so the count below only sees the table and waiters
        drop(self.guard.take());

        let mut locks = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&self.account_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.account_id);
        }
    }
}

impl AccountLocks {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `account_id`.
    pub async fn acquire(&self, account_id: &AccountId) -> AccountGuard {
        let lock = {
            // The map only holds Arcs, so a poisoned registry is still consistent.
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(account_id.clone()).or_default())
        };

        AccountGuard {
            account_id: account_id.clone(),
            guard: Some(lock.lock_owned().await),
            table: Arc::clone(&self.locks),
        }
    }

    /// Number of accounts currently locked or awaited.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no account is locked or awaited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_account_is_serialized() {
        let locks = Arc::new(AccountLocks::new());
        let account = AccountId::new("acct-1");

        let guard = locks.acquire(&account).await;
        assert_eq!(guard.account_id(), &account);

        let contender = {
            let locks = Arc::clone(&locks);
            let account = account.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&account).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[test]
    fn waiter_is_woken_when_guard_drops() {
        let locks = AccountLocks::new();
        let account = AccountId::new("acct-1");
        let mut holder = tokio_test::task::spawn(locks.acquire(&account));
        let guard = tokio_test::assert_ready!(holder.poll());

        let mut waiter = tokio_test::task::spawn(locks.acquire(&account));
        tokio_test::assert_pending!(waiter.poll());

        drop(guard);
        assert!(waiter.is_woken());
        tokio_test::assert_ready!(waiter.poll());
    }

    #[tokio::test]
    async fn different_accounts_do_not_block() {
        let locks = AccountLocks::new();

        let _a = locks.acquire(&AccountId::new("acct-1")).await;
        let b = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(&AccountId::new("acct-2")),
        )
        .await;

        assert!(b.is_ok());
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn released_accounts_leave_the_registry() {
        let locks = AccountLocks::new();

        for i in 0..100 {
            let _guard = locks.acquire(&AccountId::new(format!("ghost-{i}"))).await;
        }

        assert!(locks.is_empty());
    }

    #[test]
    fn entry_survives_while_a_waiter_is_queued() {
        let locks = AccountLocks::new();
        let account = AccountId::new("acct-1");
        let mut holder = tokio_test::task::spawn(locks.acquire(&account));
        let guard = tokio_test::assert_ready!(holder.poll());
        let mut waiter = tokio_test::task::spawn(locks.acquire(&account));
        tokio_test::assert_pending!(waiter.poll());

        drop(guard);
        assert_eq!(locks.len(), 1);

        let second = tokio_test::assert_ready!(waiter.poll());
        drop(second);
        assert!(locks.is_empty());
    }
}
