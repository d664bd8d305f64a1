//! # Money
//!
//! Daily rates, rental totals and revenue, held as whole cents.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  backend JSON            core                       backend JSON        │
//! │                                                                         │
//! │  "pricePerDay": 49.99 ─► Money(4999)                                    │
//! │                            │ multiply_days(7)                           │
//! │                            ▼                                            │
//! │                          Money(34993) ───────────► "totalPrice": 349.93 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Decimal amounts only exist at the two edges of that picture:
//! [`Money::from_wire_amount`] and [`Money::to_wire_amount`]. Everything in
//! between is integer arithmetic, so a quote computed twice is identical.
//!
//! ```rust
//! use drivehub_core::money::Money;
//!
//! let rate = Money::from_wire_amount(49.99).unwrap();
//! assert_eq!(rate.multiply_days(7), Some(Money::from_cents(34993)));
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

const CENTS_PER_UNIT: i64 = 100;

/// An amount in cents. Negative values only arise from bad input and are
/// rejected by validation before they reach a vehicle or a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Whole currency units, e.g. `from_major(300)` for a $300/day SUV.
    #[inline]
    pub const fn from_major(units: i64) -> Self {
        Money(units * CENTS_PER_UNIT)
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Reads a decimal amount as sent by the booking backend.
    ///
    /// The nearest cent wins (`19.999` becomes `20.00`). Non-finite input and
    /// amounts beyond the `i64` cent range give `None`.
    ///
    /// ```rust
    /// use drivehub_core::money::Money;
    ///
    /// assert_eq!(Money::from_wire_amount(150.0), Some(Money::from_major(150)));
    /// assert_eq!(Money::from_wire_amount(f64::NAN), None);
    /// ```
    pub fn from_wire_amount(amount: f64) -> Option<Self> {
        let cents = (amount * CENTS_PER_UNIT as f64).round();
        if !cents.is_finite() || cents.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// The decimal amount the booking backend expects.
    pub fn to_wire_amount(&self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT as f64
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole units, truncated toward zero.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / CENTS_PER_UNIT
    }

    /// Remaining cents, always `0..=99`.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % CENTS_PER_UNIT).abs()
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Rental total for `days` days at this daily rate, or `None` when it
    /// would not fit in `i64` cents.
    #[inline]
    pub const fn multiply_days(&self, days: i64) -> Option<Self> {
        match self.0.checked_mul(days) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

/// `$` formatting for logs and tests. Storefront output goes through
/// `ConfigState::format_money`, which knows the configured symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            f.write_str("-")?;
        }
        write!(f, "${}.{:02}", self.dollars().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Money;

    #[inline]
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

/// Owner revenue is the sum of booking totals.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts() {
        let rate = Money::from_cents(4999);
        assert_eq!(rate.dollars(), 49);
        assert_eq!(rate.cents_part(), 99);
        assert_eq!(Money::from_cents(-550).cents_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(4999).to_string(), "$49.99");
        assert_eq!(Money::from_major(150).to_string(), "$150.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-$0.05");
        assert_eq!(Money::default().to_string(), "$0.00");
    }

    #[test]
    fn test_rental_total() {
        // BMW X5 at $300/day, Jan 1 to Jan 4
        assert_eq!(Money::from_major(300).multiply_days(3), Some(Money::from_major(900)));
        assert_eq!(Money::from_cents(4999).multiply_days(7), Some(Money::from_cents(34993)));
    }

    #[test]
    fn test_rental_total_overflow() {
        let rate = Money::from_wire_amount(1e16).unwrap();
        assert_eq!(rate.multiply_days(19), None);
        assert_eq!(Money::from_cents(i64::MAX).multiply_days(1), Some(Money::from_cents(i64::MAX)));
    }

    #[test]
    fn test_wire_amounts() {
        assert_eq!(Money::from_wire_amount(0.1 + 0.2), Some(Money::from_cents(30)));
        assert_eq!(Money::from_wire_amount(19.999), Some(Money::from_cents(2000)));
        assert_eq!(Money::from_wire_amount(-5.5), Some(Money::from_cents(-550)));
        assert_eq!(Money::from_wire_amount(f64::INFINITY), None);
        assert_eq!(Money::from_wire_amount(1e30), None);
        assert_eq!(Money::from_major(900).to_wire_amount(), 900.0);
    }

    #[test]
    fn test_revenue_sum() {
        let totals = [Money::from_major(150), Money::from_cents(4999)];
        assert_eq!(totals.iter().sum::<Money>().cents(), 19999);
        assert_eq!(totals.into_iter().sum::<Money>().cents(), 19999);
        assert!(!Money::zero().is_positive());
        assert!(Money::from_cents(1).is_positive());
    }
}
