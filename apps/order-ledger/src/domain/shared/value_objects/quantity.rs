//! Quantity value object for whole-share counts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// A whole number of shares.
///
/// Orders and positions trade whole shares only; a quantity is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// Zero shares.
    pub const ZERO: Self = Self(0);

    /// Create a new quantity.
    #[must_use]
    pub const fn new(shares: u32) -> Self {
        Self(shares)
    }

    /// Get the share count.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Share count as a Decimal for money arithmetic.
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }

    /// Returns true if this is zero shares.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Add, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Subtract, returning `None` on underflow.
    #[must_use]
    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        match self.0.checked_sub(rhs.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Subtract, flooring at zero.
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Validate as an order quantity in `[1, max]`.
    ///
    /// # Errors
    ///
    /// Returns error if the quantity is zero or above `max`.
    pub fn validate_for_order(&self, max: Self) -> Result<(), DomainError> {
        if self.is_zero() {
            return Err(DomainError::invalid_value(
                "quantity",
                "must be at least 1",
            ));
        }
        if *self > max {
            return Err(DomainError::invalid_value(
                "quantity",
                format!("must not exceed {max}"),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_basics() {
        let q = Quantity::new(10);
        assert_eq!(q.value(), 10);
        assert_eq!(q.as_decimal(), Decimal::from(10));
        assert!(!q.is_zero());
        assert!(Quantity::ZERO.is_zero());
        assert_eq!(format!("{q}"), "10");
    }

    #[test]
    fn quantity_sub() {
        let q = Quantity::new(10);
        assert_eq!(q.checked_sub(Quantity::new(4)), Some(Quantity::new(6)));
        assert_eq!(q.checked_sub(Quantity::new(11)), None);
        assert_eq!(q.saturating_sub(Quantity::new(11)), Quantity::ZERO);
        assert_eq!(q.checked_add(Quantity::new(5)), Some(Quantity::new(15)));
        assert_eq!(Quantity::new(u32::MAX).checked_add(Quantity::new(1)), None);
    }

    #[test]
    fn quantity_validate_for_order() {
        let max = Quantity::new(10_000);
        assert!(Quantity::new(1).validate_for_order(max).is_ok());
        assert!(Quantity::new(10_000).validate_for_order(max).is_ok());
        assert!(Quantity::ZERO.validate_for_order(max).is_err());
        assert!(Quantity::new(10_001).validate_for_order(max).is_err());
    }
}
