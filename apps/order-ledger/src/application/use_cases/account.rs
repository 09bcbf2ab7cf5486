//! Account Use Cases

use std::sync::Arc;

use crate::application::dto::AccountView;
use crate::application::ports::LedgerStore;
use crate::application::services::AccountLocks;
use crate::application::use_cases::support::load_account;
use crate::domain::ledger::Account;
use crate::domain::shared::{AccountId, Money};
use crate::error::EngineError;

/// Opening and reading accounts.
pub struct AccountUseCase<S: LedgerStore> {
    store: Arc<S>,
    locks: Arc<AccountLocks>,
    opening_balance: Money,
}

impl<S: LedgerStore> AccountUseCase<S> {
    /// Create a new AccountUseCase.
    pub const fn new(store: Arc<S>, locks: Arc<AccountLocks>, opening_balance: Money) -> Self {
        Self {
            store,
            locks,
            opening_balance,
        }
    }

    /// Open an account funded with the configured opening balance.
    ///
    /// # Errors
    ///
    /// `VALIDATION_ERROR` for an empty id or an account that already exists.
    pub async fn open_account(&self, account_id: &AccountId) -> Result<AccountView, EngineError> {
        if account_id.as_str().trim().is_empty() {
            return Err(EngineError::invalid_field("account_id", "must not be empty"));
        }

        let _guard = self.locks.acquire(account_id).await;

        if self.store.find_account(account_id).await?.is_some() {
            return Err(EngineError::invalid_field(
                "account_id",
                format!("account {account_id} already exists"),
            ));
        }

        let account = Account::open(account_id.clone(), self.opening_balance)?;
        self.store.insert_account(&account).await?;
        tracing::info!(
            account_id = %account_id,
            opening_balance = %self.opening_balance,
            "Account opened"
        );

        Ok(AccountView::from_account(&account))
    }

    /// Balances and free margin of an account.
    ///
    /// # Errors
    ///
    /// `NOT_FOUND` for an unknown account.
    pub async fn get_account(&self, account_id: &AccountId) -> Result<AccountView, EngineError> {
        let account = load_account(&*self.store, account_id).await?;
        Ok(AccountView::from_account(&account))
    }
}
