//! Fixed-point display type with 2 decimal places.
//!
//! Amounts are kept at full precision in the transaction model and only
//! rounded here, at the moment they are written out.

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

/// A decimal value rounded to exactly 2 decimal places.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use rust_decimal::Decimal;
/// use bank2qif::Decimal2;
///
/// let amount = Decimal2::new(Decimal::from_str("-1500").unwrap());
/// assert_eq!(amount.to_string(), "-1500.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Decimal2(Decimal);

impl Decimal2 {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Rounds half away from zero and pads to 2 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut rounded =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::SCALE);
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        Decimal2(rounded)
    }

    /// Returns the rounded value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for Decimal2 {
    fn from(value: Decimal) -> Self {
        Decimal2::new(value)
    }
}

impl fmt::Display for Decimal2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d2(s: &str) -> String {
        Decimal2::new(Decimal::from_str(s).unwrap()).to_string()
    }

    #[test]
    fn test_pads_to_two_places() {
        assert_eq!(d2("1"), "1.00");
        assert_eq!(d2("1.5"), "1.50");
        assert_eq!(d2("-12.3"), "-12.30");
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(d2("0.005"), "0.01");
        assert_eq!(d2("-0.005"), "-0.01");
        assert_eq!(d2("2.344"), "2.34");
        assert_eq!(d2("1.23456"), "1.23");
    }

    #[test]
    fn test_negative_zero_prints_unsigned() {
        assert_eq!(d2("-0.001"), "0.00");
        assert_eq!(d2("-0"), "0.00");
    }
}
