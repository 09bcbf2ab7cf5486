//! Order status in the lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an order.
///
/// `PENDING` is transient: an order is never left there after a successful
/// placement. `PARTIAL` is a legal state that the engine currently never
/// produces since every execution fills the full quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created, not yet checked or dispatched.
    Pending,
    /// Resting with collateral reserved.
    Open,
    /// Partially executed.
    Partial,
    /// Fully executed.
    Complete,
    /// Cancelled by the user.
    Cancelled,
    /// Refused by a pre-trade check or a failed settlement.
    Rejected,
}

impl OrderStatus {
    /// Returns true if the order can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Cancelled | Self::Rejected)
    }

    /// Returns true if a user may cancel the order.
    #[must_use]
    pub const fn is_cancelable(&self) -> bool {
        matches!(self, Self::Pending | Self::Open)
    }

    /// Returns true if the order holds reserved collateral.
    #[must_use]
    pub const fn holds_reservation(&self) -> bool {
        matches!(self, Self::Open | Self::Partial)
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Open => "OPEN",
            Self::Partial => "PARTIAL",
            Self::Complete => "COMPLETE",
            Self::Cancelled => "CANCELLED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
