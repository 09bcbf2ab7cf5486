//! Ledger Bounded Context
//!
//! Owns each account's cash balance and blocked margin.
//!
//! # Key Concepts
//!
//! - **Free margin**: `available_balance - used_margin`, never negative at rest
//! - **Reserve / release**: block and unblock margin for open BUY orders
//! - **Settle**: debit or credit cash when an order executes

pub mod aggregate;
pub mod errors;
pub mod repository;

pub use aggregate::Account;
pub use errors::LedgerError;
pub use repository::AccountRepository;
