//! Persistence Adapters
//!
//! Storage implementations of the repository traits and the unit of work.

pub mod in_memory;

pub use in_memory::{InMemoryInstrumentCatalog, InMemoryLedgerStore};
