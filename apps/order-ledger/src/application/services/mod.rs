//! Application Services
//!
//! Cross-cutting pieces shared by the use cases.

mod account_locks;
mod event_dispatch;
mod ledger_committer;

pub use account_locks::{AccountGuard, AccountLocks};
pub use event_dispatch::{dispatch_events, spawn_dispatch};
pub use ledger_committer::LedgerCommitter;
