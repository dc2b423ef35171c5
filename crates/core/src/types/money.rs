//! Decimal money amounts.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in the store currency's standard unit.
///
/// Backed by [`rust_decimal::Decimal`] so totals never accumulate binary
/// floating point error. Serialized as a decimal string (`"12.34"`), which
/// is what the data platform stores in its numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply a unit price by a quantity.
    #[must_use]
    pub fn mul_quantity(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl fmt::Display for Money {
    /// Format for display (e.g., `$19.99`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::new(s.parse().unwrap())
    }

    #[test]
    fn test_display() {
        assert_eq!(money("19.99").to_string(), "$19.99");
        assert_eq!(money("5").to_string(), "$5.00");
        assert_eq!(Money::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_mul_quantity() {
        let unit = money("2.50");
        assert_eq!(unit.mul_quantity(3), money("7.50"));
        assert_eq!(unit.mul_quantity(0), money("0.00"));
    }

    #[test]
    fn test_sum() {
        let total: Money = ["1.10", "2.20", "3.30"].into_iter().map(money).sum();
        assert_eq!(total, money("6.60"));
    }

    #[test]
    fn test_serde_string_and_number() {
        let value = money("12.34");
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"12.34\"");
        // The platform's REST layer returns numeric columns as JSON numbers.
        let from_number: Money = serde_json::from_str("12.34").unwrap();
        assert_eq!(from_number, value);
    }
}
