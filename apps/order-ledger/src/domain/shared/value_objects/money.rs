//! Money value object for currency amounts.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use super::Quantity;
use crate::domain::shared::DomainError;

/// Scale used for presentation of money values.
pub const DISPLAY_SCALE: u32 = 2;

/// Scale used when storing a per-share average cost.
pub const AVERAGE_COST_SCALE: u32 = 4;

/// A monetary amount (prices, balances, P&L).
///
/// Represented as a Decimal for precise financial calculations. Internal
/// precision is never truncated; [`Money::round`] is for presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Smallest accepted order price (0.01).
    pub const MIN_PRICE: Self = Self(Decimal::from_parts(1, 0, 0, false, 2));

    /// Largest accepted price (1,000,000,000).
    ///
    /// Keeps `price * quantity` for any `u32` share count, and the sums of
    /// such amounts, far inside `Decimal` range.
    pub const MAX_PRICE: Self = Self(Decimal::from_parts(1_000_000_000, 0, 0, false, 0));

    /// Create a new Money value from a Decimal.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the inner Decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if this amount is positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns true if this amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns true if this amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == Decimal::ZERO
    }

    /// Round to 2 decimal places (banker's rounding).
    #[must_use]
    pub fn round(&self) -> Self {
        self.round_to(DISPLAY_SCALE)
    }

    /// Round to `scale` decimal places, midpoint to even.
    #[must_use]
    pub fn round_to(&self, scale: u32) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven),
        )
    }

    /// The larger of `self` and zero.
    #[must_use]
    pub fn max_zero(self) -> Self {
        self.max(Self::ZERO)
    }

    /// Divide by a share count, `None` when the count is zero.
    #[must_use]
    pub fn per_share(&self, quantity: Quantity) -> Option<Self> {
        if quantity.is_zero() {
            return None;
        }
        self.0.checked_div(quantity.as_decimal()).map(Self)
    }

    /// Percentage of `self` over `base`: `(self / base)` at 4 dp, times 100.
    ///
    /// Zero when `base` is not positive.
    #[must_use]
    pub fn percent_of(&self, base: Self) -> Decimal {
        if !base.is_positive() {
            return Decimal::ZERO;
        }
        self.0.checked_div(base.0).map_or(Decimal::ZERO, |ratio| {
            ratio.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
                * Decimal::ONE_HUNDRED
        })
    }

    /// Validate as a price.
    ///
    /// # Errors
    ///
    /// Returns error if the price is below 0.01 or above [`Money::MAX_PRICE`].
    pub fn validate_as_price(&self, field: &str) -> Result<(), DomainError> {
        if *self < Self::MIN_PRICE {
            return Err(DomainError::invalid_value(
                field,
                format!("must be at least {}", Self::MIN_PRICE),
            ));
        }
        if *self > Self::MAX_PRICE {
            return Err(DomainError::invalid_value(
                field,
                format!("must not exceed {}", Self::MAX_PRICE),
            ));
        }
        Ok(())
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Mul<Quantity> for Money {
    type Output = Self;

    fn mul(self, rhs: Quantity) -> Self::Output {
        Self(self.0 * rhs.as_decimal())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}
