//! Position Aggregate
//!
//! One row per (account, instrument). Applies weighted-average-cost lot
//! accounting for buys and sells and keeps realized P&L after the position
//! is closed. A zero-quantity row is a valid terminal state.

use serde::{Deserialize, Serialize};

use crate::domain::portfolio::errors::PositionError;
use crate::domain::portfolio::value_objects::PositionValuation;
use crate::domain::shared::{AVERAGE_COST_SCALE, AccountId, Money, Quantity, Symbol, Timestamp};

/// Position Aggregate Root.
///
/// Invariants:
/// - `invested_amount == quantity * average_cost` within rounding of the
///   4-dp average cost
/// - `reserved_quantity <= quantity`
/// - flat positions carry zero average cost and zero invested amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    account_id: AccountId,
    symbol: Symbol,
    quantity: Quantity,
    reserved_quantity: Quantity,
    average_cost: Money,
    invested_amount: Money,
    realized_pnl: Money,
    current_value: Money,
    unrealized_pnl: Money,
    valued_at: Option<Timestamp>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Position {
    /// Create an empty position, ready for its first buy.
    #[must_use]
    pub fn open(account_id: AccountId, symbol: Symbol) -> Self {
        let now = Timestamp::now();
        Self {
            account_id,
            symbol,
            quantity: Quantity::ZERO,
            reserved_quantity: Quantity::ZERO,
            average_cost: Money::ZERO,
            invested_amount: Money::ZERO,
            realized_pnl: Money::ZERO,
            current_value: Money::ZERO,
            unrealized_pnl: Money::ZERO,
            valued_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Get the owning account.
    #[must_use]
    pub const fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Get the instrument symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Get the shares held.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Get the shares blocked by open SELL orders.
    #[must_use]
    pub const fn reserved_quantity(&self) -> Quantity {
        self.reserved_quantity
    }

    /// Shares free to sell: held minus reserved.
    #[must_use]
    pub const fn available_quantity(&self) -> Quantity {
        self.quantity.saturating_sub(self.reserved_quantity)
    }

    /// Get the weighted-average cost per share.
    #[must_use]
    pub const fn average_cost(&self) -> Money {
        self.average_cost
    }

    /// Get the capital tied up in the held shares.
    #[must_use]
    pub const fn invested_amount(&self) -> Money {
        self.invested_amount
    }

    /// Get the cumulative realized P&L.
    #[must_use]
    pub const fn realized_pnl(&self) -> Money {
        self.realized_pnl
    }

    /// Get the last persisted current value.
    #[must_use]
    pub const fn current_value(&self) -> Money {
        self.current_value
    }

    /// Get the last persisted unrealized P&L.
    #[must_use]
    pub const fn unrealized_pnl(&self) -> Money {
        self.unrealized_pnl
    }

    /// When the stored valuation was last refreshed.
    #[must_use]
    pub const fn valued_at(&self) -> Option<Timestamp> {
        self.valued_at
    }

    /// Returns true while shares are held.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !self.quantity.is_zero()
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Get the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ========================================================================
    // Lot Accounting
    // ========================================================================

    /// Add `qty` shares bought at `price`.
    ///
    /// Average cost is recomputed as `invested / quantity`, rounded to 4 dp
    /// midpoint-to-even.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTrade` if `qty` is zero or `price` is not positive,
    /// and `QuantityOverflow` if the share count would not fit; the position
    /// is left unchanged in both cases.
    pub fn apply_buy(&mut self, qty: Quantity, price: Money) -> Result<(), PositionError> {
        Self::ensure_trade(qty, price)?;

        let new_quantity =
            self.quantity
                .checked_add(qty)
                .ok_or_else(|| PositionError::QuantityOverflow {
                    symbol: self.symbol.clone(),
                    held: self.quantity,
                    added: qty,
                })?;
        let new_invested = self.invested_amount + price * qty;

        self.average_cost = new_invested
            .per_share(new_quantity)
            .map_or(Money::ZERO, |avg| avg.round_to(AVERAGE_COST_SCALE));
        self.invested_amount = new_invested;
        self.quantity = new_quantity;
        self.touch();
        Ok(())
    }

    /// Remove `qty` shares sold at `price` and book the realized P&L.
    ///
    /// Average cost does not change; on a full close it resets to zero along
    /// with the invested amount. Returns the realized P&L of this sale.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientHoldings` if `qty` exceeds the shares held, and
    /// leaves the position unchanged.
    pub fn apply_sell(&mut self, qty: Quantity, price: Money) -> Result<Money, PositionError> {
        Self::ensure_trade(qty, price)?;

        let Some(remaining) = self.quantity.checked_sub(qty) else {
            return Err(self.insufficient(qty, self.quantity));
        };

        let sale_value = price * qty;
        let cost_basis = self.average_cost * qty;
        let realized = sale_value - cost_basis;

        self.realized_pnl += realized;
        self.quantity = remaining;
        self.reserved_quantity = self.reserved_quantity.min(remaining);

        if remaining.is_zero() {
            self.average_cost = Money::ZERO;
            self.invested_amount = Money::ZERO;
        } else {
            self.invested_amount = self.average_cost * remaining;
        }
        self.touch();
        Ok(realized)
    }

    /// Block `qty` shares for an open SELL order.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientHoldings` if fewer than `qty` shares are free.
    pub fn reserve_quantity(&mut self, qty: Quantity) -> Result<(), PositionError> {
        let available = self.available_quantity();
        if qty > available {
            return Err(self.insufficient(qty, available));
        }
        self.reserved_quantity = self
            .reserved_quantity
            .checked_add(qty)
            .ok_or_else(|| self.insufficient(qty, available))?;
        self.touch();
        Ok(())
    }

    /// Unblock `qty` shares, flooring at zero.
    pub fn release_quantity(&mut self, qty: Quantity) {
        self.reserved_quantity = self.reserved_quantity.saturating_sub(qty);
        self.touch();
    }

    // ========================================================================
    // Valuation
    // ========================================================================

    /// Value the position at `price` without changing it.
    #[must_use]
    pub fn mark_to_market(&self, price: Option<Money>) -> PositionValuation {
        match price {
            Some(price) if self.is_open() => {
                let current_value = price * self.quantity;
                PositionValuation {
                    price: Some(price),
                    current_value,
                    unrealized_pnl: current_value - self.invested_amount,
                }
            }
            _ => PositionValuation::unpriced(price),
        }
    }

    /// Store a valuation computed by [`Position::mark_to_market`].
    pub fn apply_valuation(&mut self, valuation: &PositionValuation) {
        self.current_value = valuation.current_value;
        self.unrealized_pnl = valuation.unrealized_pnl;
        let now = Timestamp::now();
        self.valued_at = Some(now);
        self.updated_at = now;
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn ensure_trade(qty: Quantity, price: Money) -> Result<(), PositionError> {
        if qty.is_zero() {
            return Err(PositionError::InvalidTrade {
                field: "quantity".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if !price.is_positive() {
            return Err(PositionError::InvalidTrade {
                field: "price".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    fn insufficient(&self, requested: Quantity, available: Quantity) -> PositionError {
        PositionError::InsufficientHoldings {
            symbol: self.symbol.clone(),
            requested,
            available,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(v: rust_decimal::Decimal) -> Money {
        Money::new(v)
    }

    fn position() -> Position {
        Position::open(AccountId::new("acct-1"), Symbol::new("TCS"))
    }

    #[test]
    fn first_buy_sets_average_cost() {
        let mut pos = position();
        pos.apply_buy(Quantity::new(10), money(dec!(100))).unwrap();

        assert_eq!(pos.quantity(), Quantity::new(10));
        assert_eq!(pos.average_cost(), money(dec!(100)));
        assert_eq!(pos.invested_amount(), money(dec!(1000)));
        assert!(pos.is_open());
    }

    #[test]
    fn second_buy_weights_average_cost() {
        let mut pos = position();
        pos.apply_buy(Quantity::new(10), money(dec!(100))).unwrap();
        pos.apply_buy(Quantity::new(5), money(dec!(130))).unwrap();

        assert_eq!(pos.quantity(), Quantity::new(15));
        assert_eq!(pos.invested_amount(), money(dec!(1650)));
        assert_eq!(pos.average_cost(), money(dec!(110)));
    }

    #[test]
    fn average_cost_rounds_to_four_places() {
        let mut pos = position();
        pos.apply_buy(Quantity::new(3), money(dec!(10))).unwrap();
        pos.apply_buy(Quantity::new(3), money(dec!(10.01))).unwrap();
        pos.apply_buy(Quantity::new(1), money(dec!(10.02))).unwrap();

        // 70.05 / 7 = 10.007142857...
        assert_eq!(pos.average_cost(), money(dec!(10.0071)));
        assert_eq!(pos.invested_amount(), money(dec!(70.05)));
    }

    #[test]
    fn partial_sell_books_realized_pnl_and_keeps_average_cost() {
        let mut pos = position();
        pos.apply_buy(Quantity::new(10), money(dec!(100))).unwrap();

        let realized = pos.apply_sell(Quantity::new(4), money(dec!(110))).unwrap();

        assert_eq!(realized, money(dec!(40)));
        assert_eq!(pos.realized_pnl(), money(dec!(40)));
        assert_eq!(pos.quantity(), Quantity::new(6));
        assert_eq!(pos.average_cost(), money(dec!(100)));
        assert_eq!(pos.invested_amount(), money(dec!(600)));
    }

    #[test]
    fn full_sell_resets_cost_but_keeps_realized_pnl() {
        let mut pos = position();
        pos.apply_buy(Quantity::new(10), money(dec!(100))).unwrap();
        pos.apply_sell(Quantity::new(10), money(dec!(90))).unwrap();

        assert_eq!(pos.quantity(), Quantity::ZERO);
        assert_eq!(pos.average_cost(), Money::ZERO);
        assert_eq!(pos.invested_amount(), Money::ZERO);
        assert_eq!(pos.realized_pnl(), money(dec!(-100)));
        assert!(!pos.is_open());
    }

    #[test]
    fn oversell_fails_and_leaves_position_unchanged() {
        let mut pos = position();
        pos.apply_buy(Quantity::new(10), money(dec!(100))).unwrap();
        let before = pos.clone();

        let err = pos.apply_sell(Quantity::new(11), money(dec!(100))).unwrap_err();

        assert!(matches!(err, PositionError::InsufficientHoldings { .. }));
        assert_eq!(pos, before);
    }

    #[test]
    fn buy_past_the_share_limit_fails_and_leaves_position_unchanged() {
        let mut pos = position();
        pos.apply_buy(Quantity::new(u32::MAX), money(dec!(1))).unwrap();
        let before = pos.clone();

        let err = pos.apply_buy(Quantity::new(1), money(dec!(1))).unwrap_err();

        assert!(matches!(err, PositionError::QuantityOverflow { .. }));
        assert_eq!(pos, before);
        assert_eq!(pos.quantity(), Quantity::new(u32::MAX));
    }

    #[test]
    fn buy_rejects_zero_quantity_and_price() {
        let mut pos = position();
        assert!(pos.apply_buy(Quantity::ZERO, money(dec!(10))).is_err());
        assert!(pos.apply_buy(Quantity::new(1), Money::ZERO).is_err());
    }

    #[test]
    fn reservations_reduce_available_quantity() {
        let mut pos = position();
        pos.apply_buy(Quantity::new(10), money(dec!(100))).unwrap();

        pos.reserve_quantity(Quantity::new(7)).unwrap();
        assert_eq!(pos.available_quantity(), Quantity::new(3));
        assert!(pos.reserve_quantity(Quantity::new(4)).is_err());

        pos.release_quantity(Quantity::new(10));
        assert_eq!(pos.reserved_quantity(), Quantity::ZERO);
        assert_eq!(pos.available_quantity(), Quantity::new(10));
    }

    #[test]
    fn mark_to_market_is_pure() {
        let mut pos = position();
        pos.apply_buy(Quantity::new(10), money(dec!(100))).unwrap();

        let valuation = pos.mark_to_market(Some(money(dec!(120))));

        assert_eq!(valuation.current_value, money(dec!(1200)));
        assert_eq!(valuation.unrealized_pnl, money(dec!(200)));
        assert_eq!(pos.current_value(), Money::ZERO);
        assert!(pos.valued_at().is_none());

        pos.apply_valuation(&valuation);
        assert_eq!(pos.unrealized_pnl(), money(dec!(200)));
        assert!(pos.valued_at().is_some());
    }

    #[test]
    fn mark_to_market_without_price_is_zero() {
        let mut pos = position();
        pos.apply_buy(Quantity::new(10), money(dec!(100))).unwrap();

        let valuation = pos.mark_to_market(None);
        assert_eq!(valuation.current_value, Money::ZERO);
        assert_eq!(valuation.unrealized_pnl, Money::ZERO);
    }
}
