//! Order Execution Domain Services
//!
//! Stateless business logic that doesn't fit in aggregates.

mod order_state_machine;
mod pre_trade_check;
mod settlement;

pub use order_state_machine::OrderStateMachine;
pub use pre_trade_check::{PreTradeApproval, PreTradeCheck};
pub use settlement::{Settlement, SettledExecution, SettlementError};
