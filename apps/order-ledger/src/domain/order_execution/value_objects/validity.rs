//! Order validity. Stored with the order; no expiry sweep acts on it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How long an order is meant to stay live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Validity {
    /// Valid for the trading day.
    #[default]
    Day,
    /// Immediate or cancel.
    Ioc,
    /// Good till date.
    Gtd,
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "DAY"),
            Self::Ioc => write!(f, "IOC"),
            Self::Gtd => write!(f, "GTD"),
        }
    }
}
