//! Signed fixed-point decimal with 18 fractional digits.
//!
//! Backed by an `i128` count of 10^-18 units. Products and quotients are
//! widened to 256 bits before they are scaled back, so no intermediate step
//! loses precision. Every operation names its rounding mode: `_truncate`
//! chops toward zero, the plain form rounds half away from zero.

use crate::error::TypesError;
use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of fractional decimal digits.
pub const DECIMAL_PLACES: u32 = 18;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal(i128);

#[derive(Clone, Copy)]
enum Rounding {
    Truncate,
    HalfAwayFromZero,
}

impl Decimal {
    /// 10^18, the number of atomics in one whole unit.
    pub const PRECISION_SCALE: u128 = 1_000_000_000_000_000_000;

    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(Self::PRECISION_SCALE as i128);

    /// Build from a raw count of 10^-18 units.
    pub const fn from_atomics(atomics: i128) -> Self {
        Self(atomics)
    }

    pub fn atomics(&self) -> i128 {
        self.0
    }

    /// `n / 100`.
    pub fn percent(n: i64) -> Self {
        Self(n as i128 * (Self::PRECISION_SCALE as i128 / 100))
    }

    /// `n / 1000`.
    pub fn permille(n: i64) -> Self {
        Self(n as i128 * (Self::PRECISION_SCALE as i128 / 1000))
    }

    /// `numerator / denominator`, rounded half away from zero.
    pub fn from_ratio(numerator: i128, denominator: i128) -> Result<Self, TypesError> {
        Self::from_atomics(numerator.checked_mul(Self::PRECISION_SCALE as i128).ok_or(TypesError::Overflow)?)
            .checked_quo(Self::from_atomics(
                denominator
                    .checked_mul(Self::PRECISION_SCALE as i128)
                    .ok_or(TypesError::Overflow)?,
            ))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Self) -> Result<Self, TypesError> {
        self.0.checked_add(other.0).map(Self).ok_or(TypesError::Overflow)
    }

    pub fn checked_sub(self, other: Self) -> Result<Self, TypesError> {
        self.0.checked_sub(other.0).map(Self).ok_or(TypesError::Overflow)
    }

    /// Product rounded half away from zero.
    pub fn checked_mul(self, other: Self) -> Result<Self, TypesError> {
        self.mul_with(other, Rounding::HalfAwayFromZero)
    }

    /// Product truncated toward zero.
    pub fn checked_mul_truncate(self, other: Self) -> Result<Self, TypesError> {
        self.mul_with(other, Rounding::Truncate)
    }

    /// Quotient rounded half away from zero.
    pub fn checked_quo(self, other: Self) -> Result<Self, TypesError> {
        self.quo_with(other, Rounding::HalfAwayFromZero)
    }

    /// Quotient truncated toward zero.
    pub fn checked_quo_truncate(self, other: Self) -> Result<Self, TypesError> {
        self.quo_with(other, Rounding::Truncate)
    }

    fn mul_with(self, other: Self, rounding: Rounding) -> Result<Self, TypesError> {
        let negative = self.is_negative() != other.is_negative();
        let product = U256::from(self.0.unsigned_abs()) * U256::from(other.0.unsigned_abs());
        let scale = U256::from(Self::PRECISION_SCALE);
        let magnitude = round_div(product, scale, rounding);
        from_magnitude(magnitude, negative)
    }

    fn quo_with(self, other: Self, rounding: Rounding) -> Result<Self, TypesError> {
        if other.is_zero() {
            return Err(TypesError::DivisionByZero);
        }
        let negative = self.is_negative() != other.is_negative();
        let numerator =
            U256::from(self.0.unsigned_abs()) * U256::from(Self::PRECISION_SCALE);
        let magnitude = round_div(numerator, U256::from(other.0.unsigned_abs()), rounding);
        from_magnitude(magnitude, negative)
    }
}

fn round_div(numerator: U256, denominator: U256, rounding: Rounding) -> U256 {
    let quotient = numerator / denominator;
    match rounding {
        Rounding::Truncate => quotient,
        Rounding::HalfAwayFromZero => {
            let remainder = numerator % denominator;
            // remainder * 2 >= denominator, written without overflowing.
            if remainder >= denominator - remainder {
                quotient + U256::one()
            } else {
                quotient
            }
        }
    }
}

fn from_magnitude(magnitude: U256, negative: bool) -> Result<Decimal, TypesError> {
    if magnitude > U256::from(i128::MAX as u128) {
        return Err(TypesError::Overflow);
    }
    let value = magnitude.as_u128() as i128;
    Ok(Decimal(if negative { -value } else { value }))
}

impl FromStr for Decimal {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypesError::InvalidDecimal(s.to_string());
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (whole, frac) = match body.split_once('.') {
            Some((w, f)) => (w, f),
            None => (body, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac.len() > DECIMAL_PLACES as usize
            || (body.contains('.') && frac.is_empty())
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let whole: i128 = whole.parse().map_err(|_| invalid())?;
        let mut frac_atomics: i128 = 0;
        if !frac.is_empty() {
            frac_atomics = frac.parse().map_err(|_| invalid())?;
            frac_atomics *= 10i128.pow(DECIMAL_PLACES - frac.len() as u32);
        }
        let atomics = whole
            .checked_mul(Self::PRECISION_SCALE as i128)
            .and_then(|w| w.checked_add(frac_atomics))
            .ok_or_else(invalid)?;
        Ok(Self(if negative { -atomics } else { atomics }))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let whole = magnitude / Self::PRECISION_SCALE;
        let frac = magnitude % Self::PRECISION_SCALE;
        write!(f, "{sign}{whole}.{frac:018}")
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
