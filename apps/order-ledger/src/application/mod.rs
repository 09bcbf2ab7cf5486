//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for persistence, quotes and notifications
//! - **Services**: Per-account locking and the retried atomic commit
//! - **Use Cases**: The operations exposed to the transport layer
//! - **DTOs**: Views returned across that boundary

pub mod dto;
pub mod ports;
pub mod services;
pub mod use_cases;

pub use dto::*;
pub use ports::*;
pub use use_cases::*;
