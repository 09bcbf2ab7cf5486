//! Infrastructure Layer
//!
//! This module contains the adapters (implementations) for the ports defined
//! in the application layer:
//!
//! - `persistence/`: In-memory ledger store and instrument catalog
//! - `market_data/`: Quote source adapters
//! - `notifications/`: Order event dispatch
//! - `config/`: Dependency injection container

pub mod config;
pub mod market_data;
pub mod notifications;
pub mod persistence;

pub use config::{Container, InMemoryContainer};
