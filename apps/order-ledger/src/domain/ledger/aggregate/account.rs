//! Account Aggregate Root
//!
//! Holds a user's cash balance and blocked margin. Every mutation is a
//! single-field read-modify-write; callers serialize them per account.

use serde::{Deserialize, Serialize};

use crate::domain::ledger::errors::LedgerError;
use crate::domain::shared::{AccountId, DomainError, Money, Timestamp};

/// Account Aggregate Root.
///
/// Invariant: `free_margin = available_balance - used_margin >= 0` after
/// every successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    available_balance: Money,
    used_margin: Money,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Account {
    /// Open a new account with an opening balance.
    ///
    /// # Errors
    ///
    /// Returns error if the opening balance is negative.
    pub fn open(id: AccountId, opening_balance: Money) -> Result<Self, DomainError> {
        if opening_balance.is_negative() {
            return Err(DomainError::invalid_value(
                "opening_balance",
                "must not be negative",
            ));
        }
        let now = Timestamp::now();
        Ok(Self {
            id,
            available_balance: opening_balance,
            used_margin: Money::ZERO,
            created_at: now,
            updated_at: now,
        })
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Get the account ID.
    #[must_use]
    pub const fn id(&self) -> &AccountId {
        &self.id
    }

    /// Get the cash balance.
    #[must_use]
    pub const fn available_balance(&self) -> Money {
        self.available_balance
    }

    /// Get the margin blocked by open orders.
    #[must_use]
    pub const fn used_margin(&self) -> Money {
        self.used_margin
    }

    /// Spendable buying power: `available_balance - used_margin`.
    #[must_use]
    pub fn free_margin(&self) -> Money {
        self.available_balance - self.used_margin
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Get the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ========================================================================
    // Balance Mutations
    // ========================================================================

    /// Block `amount` of margin for an open order.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` if free margin would drop below zero. The
    /// account is left untouched on error.
    pub fn reserve(&mut self, amount: Money) -> Result<(), LedgerError> {
        Self::ensure_non_negative("reserve", amount)?;
        self.ensure_covers(amount)?;
        self.used_margin += amount;
        self.touch();
        Ok(())
    }

    /// Unblock `amount` of margin, flooring used margin at zero.
    ///
    /// # Errors
    ///
    /// Returns error if `amount` is negative.
    pub fn release(&mut self, amount: Money) -> Result<(), LedgerError> {
        Self::ensure_non_negative("release", amount)?;
        self.used_margin = (self.used_margin - amount).max_zero();
        self.touch();
        Ok(())
    }

    /// Debit the cash balance for an executed BUY.
    ///
    /// Does not touch used margin.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` if free margin would drop below zero.
    pub fn settle_buy(&mut self, amount: Money) -> Result<(), LedgerError> {
        Self::ensure_non_negative("settle_buy", amount)?;
        self.ensure_covers(amount)?;
        self.available_balance -= amount;
        self.touch();
        Ok(())
    }

    /// Credit the cash balance for an executed SELL.
    ///
    /// # Errors
    ///
    /// Returns error if `amount` is negative.
    pub fn settle_sell(&mut self, amount: Money) -> Result<(), LedgerError> {
        Self::ensure_non_negative("settle_sell", amount)?;
        self.available_balance += amount;
        self.touch();
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn ensure_non_negative(operation: &'static str, amount: Money) -> Result<(), LedgerError> {
        if amount.is_negative() {
            return Err(LedgerError::InvalidAmount { operation, amount });
        }
        Ok(())
    }

    fn ensure_covers(&self, amount: Money) -> Result<(), LedgerError> {
        let available = self.free_margin();
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                required: amount,
                available,
            });
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
