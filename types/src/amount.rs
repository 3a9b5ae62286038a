//! Token amount type.
//!
//! Amounts are non-negative 256-bit integers (`U256`) so that no realistic
//! supply can overflow. All arithmetic is checked; the panicking operators are
//! reserved for call sites that have already proven the result fits.

use crate::decimal::Decimal;
use crate::error::TypesError;
use primitive_types::{U256, U512};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A coin amount in base units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(U256);

impl Amount {
    pub const ZERO: Self = Self(U256([0; 4]));

    pub fn new(raw: U256) -> Self {
        Self(raw)
    }

    pub fn from_u128(raw: u128) -> Self {
        Self(U256::from(raw))
    }

    pub fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// `floor(self × rate)`.
    pub fn mul_dec_truncate(self, rate: Decimal) -> Result<Self, TypesError> {
        let (quotient, _) = self.mul_dec_parts(rate)?;
        narrow(quotient)
    }

    /// `self × rate` rounded half away from zero.
    pub fn mul_dec_round(self, rate: Decimal) -> Result<Self, TypesError> {
        let (quotient, remainder) = self.mul_dec_parts(rate)?;
        let half = U512::from(Decimal::PRECISION_SCALE / 2);
        let rounded = if remainder >= half {
            quotient + U512::one()
        } else {
            quotient
        };
        narrow(rounded)
    }

    /// `ceil(self × rate)`.
    pub fn mul_dec_ceil(self, rate: Decimal) -> Result<Self, TypesError> {
        let (quotient, remainder) = self.mul_dec_parts(rate)?;
        let ceiled = if remainder.is_zero() {
            quotient
        } else {
            quotient + U512::one()
        };
        narrow(ceiled)
    }

    fn mul_dec_parts(self, rate: Decimal) -> Result<(U512, U512), TypesError> {
        if rate.is_negative() {
            return Err(TypesError::NegativeAmount(rate.to_string()));
        }
        let atomics = U256::from(rate.atomics().unsigned_abs());
        let product = self.0.full_mul(atomics);
        let scale = U512::from(Decimal::PRECISION_SCALE);
        Ok((product / scale, product % scale))
    }
}

fn narrow(wide: U512) -> Result<Amount, TypesError> {
    U256::try_from(wide)
        .map(Amount)
        .map_err(|_| TypesError::Overflow)
}

impl From<u128> for Amount {
    fn from(raw: u128) -> Self {
        Self::from_u128(raw)
    }
}

impl From<u64> for Amount {
    fn from(raw: u64) -> Self {
        Self(U256::from(raw))
    }
}

impl FromStr for Amount {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypesError::InvalidAmount(s.to_string()));
        }
        U256::from_dec_str(s)
            .map(Self)
            .map_err(|_| TypesError::InvalidAmount(s.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
