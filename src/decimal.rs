//! Exact monetary value type.
//!
//! Uses `rust_decimal` internally so amounts, rates and totals are compared
//! and multiplied without binary floating-point drift. A value is either held
//! exactly or refused: parsing and multiplication never round.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An immutable decimal value used for amounts, exchange rates and totals.
///
/// The scale of a parsed value is kept as written, so `"100.50"` displays as
/// `100.50`. Equality and ordering compare numeric value only: `1.0 == 1.00`.
///
/// At most 28 fractional digits and 96 bits of mantissa fit. Inputs or
/// products beyond that are rejected rather than rounded.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use top_spenders::Money;
///
/// let amount = Money::from_str("12.50").unwrap();
/// let rate = Money::from_str("1.2").unwrap();
/// assert_eq!(amount.checked_mul(rate).unwrap().to_string(), "15.000");
///
/// let tiny = Money::from_str("0.00000000000001").unwrap();
/// let tinier = Money::from_str("0.000000000000001").unwrap();
/// assert_eq!(tiny.checked_mul(tinier), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Wraps a `Decimal` without changing its scale.
    pub fn new(value: Decimal) -> Self {
        Money(value)
    }

    /// Returns `true` if this value is below zero.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Exact product, or `None` when the result overflows or would have to
    /// be rounded to fit.
    ///
    /// The product keeps the sum of both scales (`2.5 * 46.80` is `117.000`)
    /// when that fits, and falls back to the normalized operands otherwise.
    pub fn checked_mul(self, rhs: Money) -> Option<Money> {
        if self.is_zero() || rhs.is_zero() {
            return Some(Money::ZERO);
        }

        exact_product(self.0, rhs.0)
            .or_else(|| exact_product(self.0.normalize(), rhs.0.normalize()))
            .map(Money)
    }
}

// rust_decimal drops trailing digits (and the scale with them) when a product
// needs more than 28 fractional digits or 96 bits, so an unchanged scale means
// nothing was rounded away.
fn exact_product(lhs: Decimal, rhs: Decimal) -> Option<Decimal> {
    let product = lhs.checked_mul(rhs)?;
    (product.scale() == lhs.scale() + rhs.scale()).then_some(product)
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money::new(value)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    /// Parses a decimal literal, refusing any input that would lose digits.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str_exact(s.trim()).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn test_from_str_keeps_written_scale() {
        assert_eq!(money("100.50").to_string(), "100.50");
        assert_eq!(money("7").to_string(), "7");
        assert_eq!(money("  2.5  ").to_string(), "2.5");
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!(Money::from_str("abc").is_err());
        assert!(Money::from_str("").is_err());
    }

    #[test]
    fn test_from_str_rejects_lost_digits() {
        assert!(Money::from_str("0.123456789012345678901234567890123").is_err());
        assert!(Money::from_str("123456789012345678901234567890").is_err());
        assert_eq!(
            money("0.0000000000000000000000000001").to_string(),
            "0.0000000000000000000000000001"
        );
    }

    #[test]
    fn test_multiplication_is_exact() {
        assert_eq!(money("0.1").checked_mul(money("3")), Some(money("0.3")));
        assert_eq!(
            money("19.99").checked_mul(money("1.25")).unwrap().to_string(),
            "24.9875"
        );
    }

    #[test]
    fn test_multiplication_by_zero() {
        assert_eq!(money("0.00").checked_mul(money("46.80")), Some(Money::ZERO));
        assert_eq!(money("12").checked_mul(Money::ZERO), Some(Money::ZERO));
    }

    #[test]
    fn test_ordering_ignores_scale() {
        assert_eq!(money("1.0"), money("1.00"));
        assert!(money("200") > money("199.99"));
        assert!(money("0.001") > Money::ZERO);
    }

    #[test]
    fn test_overflowing_product_is_refused() {
        let huge = money("79228162514264337593543950335");
        assert_eq!(huge.checked_mul(money("2")), None);
        assert_eq!(money("50000000000000000000000000000").checked_mul(money("2")), None);
    }

    #[test]
    fn test_truncated_product_is_refused() {
        assert_eq!(
            money("12345678901234567890.123").checked_mul(money("1.000000001")),
            None
        );
    }

    #[test]
    fn test_product_below_smallest_scale_is_refused() {
        assert_eq!(
            money("0.00000000000001").checked_mul(money("0.000000000000001")),
            None
        );
    }

    #[test]
    fn test_trailing_zeros_do_not_count_as_lost_digits() {
        let product = money("0.10000000000000")
            .checked_mul(money("0.100000000000000"))
            .unwrap();
        assert_eq!(product, money("0.01"));
    }

    #[test]
    fn test_negative_detection() {
        assert!(money("-0.01").is_negative());
        assert!(!money("0").is_negative());
        assert!(!money("-0").is_negative());
        assert!(money("0.00").is_zero());
    }

    #[test]
    fn test_display_is_the_bare_decimal() {
        let total = money("91.0");
        assert_eq!(format!("{}", total), "91.0");
        assert_eq!(format!("{}", Some(total).unwrap_or_default()), "91.0");
        assert_eq!(format!("{}", Option::<Money>::None.unwrap_or_default()), "0");
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&money("12.340")).unwrap();
        assert_eq!(json, "\"12.340\"");
    }
}
