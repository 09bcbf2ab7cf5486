//! Portfolio aggregates.

mod position;

pub use position::Position;
