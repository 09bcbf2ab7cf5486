//! Strongly-typed identifiers for domain entities.
//!
//! These prevent mixing up IDs from different contexts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::Timestamp;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_id!(AccountId, "Identifier of a trading account (one per user).");
define_id!(
    OrderId,
    "Unique identifier for an order, formatted `ORD-<millis>-<hex>`."
);
define_id!(
    TradeId,
    "Unique identifier for an execution record, formatted `TXN-<millis>-<hex>`."
);

impl OrderId {
    /// Generate a fresh order identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(prefixed_id("ORD"))
    }
}

impl TradeId {
    /// Generate a fresh trade identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(prefixed_id("TXN"))
    }
}

/// `<PREFIX>-<unix millis>-<first 8 hex chars of a v4 UUID, upper-cased>`.
fn prefixed_id(prefix: &str) -> String {
    let millis = Timestamp::now().unix_millis();
    let entropy = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}-{millis}-{}", entropy[..8].to_uppercase())
}
