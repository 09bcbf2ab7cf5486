//! Application Ports (Driven)
//!
//! Interfaces the order engine uses to reach external systems.

mod notification_port;
mod quote_source_port;
mod unit_of_work_port;

pub use notification_port::{NoOpNotifier, NotificationError, NotificationPort};
pub use quote_source_port::{QuoteSourceError, QuoteSourcePort};
pub use unit_of_work_port::{LedgerChangeSet, LedgerStore, OrderWrite, UnitOfWorkPort};
