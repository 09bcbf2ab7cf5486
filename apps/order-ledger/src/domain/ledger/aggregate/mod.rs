//! Ledger aggregates.

mod account;

pub use account::Account;
