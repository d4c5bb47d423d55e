//! Decimal quantity type used for every quantity, factor, and density.
//!
//! Wraps `rust_decimal::Decimal` (96-bit mantissa, 28 significant digits).
//! Arithmetic is only available through the checked methods below so that
//! division by zero and overflow surface as [`ConversionError::Arithmetic`]
//! instead of panics.

use crate::error::ConversionError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);
    pub const ONE: Amount = Amount(Decimal::ONE);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Build from an integer mantissa and a decimal scale: `from_scaled(92, 2)` is 0.92.
    pub fn from_scaled(mantissa: i64, scale: u32) -> Self {
        Self(Decimal::new(mantissa, scale))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    pub fn checked_mul(self, rhs: Amount) -> Result<Amount, ConversionError> {
        self.0
            .checked_mul(rhs.0)
            .map(Amount)
            .ok_or_else(|| ConversionError::Arithmetic(format!("overflow computing {self} * {rhs}")))
    }

    pub fn checked_div(self, rhs: Amount) -> Result<Amount, ConversionError> {
        if rhs.is_zero() {
            return Err(ConversionError::Arithmetic(format!(
                "division by zero computing {self} / {rhs}"
            )));
        }
        self.0
            .checked_div(rhs.0)
            .map(Amount)
            .ok_or_else(|| ConversionError::Arithmetic(format!("overflow computing {self} / {rhs}")))
    }

    /// Round half away from zero to `dp` decimal places, dropping trailing zeros.
    pub fn round_dp(self, dp: u32) -> Amount {
        Amount(
            self.0
                .round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
                .normalize(),
        )
    }

    /// Absolute difference, for tolerance comparisons.
    pub fn abs_diff(self, other: Amount) -> Amount {
        Amount((self.0 - other.0).abs())
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_mul() {
        let q = Amount::from(3);
        let k = Amount::from(60);
        assert_eq!(q.checked_mul(k).unwrap(), Amount::from(180));
    }

    #[test]
    fn test_checked_div_exact_decimal() {
        // 1000 g / 1000 = 1 kg, with no binary float residue
        let grams = Amount::from(1000);
        assert_eq!(grams.checked_div(Amount::from(1000)).unwrap(), Amount::ONE);
        let tenth = Amount::ONE.checked_div(Amount::from(10)).unwrap();
        assert_eq!(tenth.to_string(), "0.1");
    }

    #[test]
    fn test_divide_by_zero_is_error() {
        let err = Amount::ONE.checked_div(Amount::ZERO).unwrap_err();
        assert!(matches!(err, ConversionError::Arithmetic(_)));
    }

    #[test]
    fn test_overflow_is_error() {
        let huge = Amount::new(Decimal::MAX);
        assert!(huge.checked_mul(Amount::from(2)).is_err());
    }

    #[test]
    fn test_sign_predicates() {
        assert!(Amount::from(-1).is_negative());
        assert!(!Amount::ZERO.is_negative());
        assert!(!Amount::ZERO.is_positive());
        assert!(Amount::from_scaled(92, 2).is_positive());
    }

    #[test]
    fn test_parse_and_display() {
        let a: Amount = " 0.920 ".parse().unwrap();
        assert_eq!(a, Amount::from_scaled(92, 2));
        assert_eq!(a.to_string(), "0.92");
        assert!("abc".parse::<Amount>().is_err());
    }

    #[test]
    fn test_round_dp() {
        let a: Amount = "16.304347826".parse().unwrap();
        assert_eq!(a.round_dp(2).to_string(), "16.3");
        let b: Amount = "2.345".parse().unwrap();
        assert_eq!(b.round_dp(2).to_string(), "2.35");
    }
}
