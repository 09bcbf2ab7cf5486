//! Instrument Bounded Context
//!
//! Reference data for tradeable instruments: symbol, name, active flag and
//! last known price.

pub mod entity;
pub mod repository;

pub use entity::Instrument;
pub use repository::InstrumentRepository;
