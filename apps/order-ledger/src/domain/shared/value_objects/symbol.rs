//! Symbol value object for instrument identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// Maximum accepted symbol length.
const MAX_SYMBOL_LEN: usize = 20;

/// An exchange ticker, e.g. "RELIANCE", "M&M", "BAJAJ-AUTO".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new Symbol.
    ///
    /// The symbol is trimmed and normalized to uppercase.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_uppercase())
    }

    /// Get the symbol string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate the symbol format.
    ///
    /// # Errors
    ///
    /// Returns error if the symbol is empty, too long, or has characters
    /// outside `[A-Z0-9&._-]`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            return Err(DomainError::invalid_value("symbol", "must not be empty"));
        }
        if self.0.len() > MAX_SYMBOL_LEN {
            return Err(DomainError::invalid_value(
                "symbol",
                format!("must be at most {MAX_SYMBOL_LEN} characters"),
            ));
        }
        if !self
            .0
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '&' | '.' | '_' | '-'))
        {
            return Err(DomainError::invalid_value(
                "symbol",
                "contains unsupported characters",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
