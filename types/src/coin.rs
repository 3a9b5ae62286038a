//! Coins and coin bundles.
//!
//! A [`Coins`] bundle is always sorted by denomination, unique by
//! denomination and free of zero amounts. Every constructor and every
//! arithmetic operation re-establishes those invariants, so a zero component
//! is represented by its absence.

use crate::amount::Amount;
use crate::decimal::Decimal;
use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Characters allowed after the first letter of a denomination.
const DENOM_EXTRA_CHARS: &[u8] = b"/:._-";

/// Validate a denomination: a letter followed by 2–127 alphanumerics or `/:._-`.
pub fn validate_denom(denom: &str) -> Result<(), TypesError> {
    let bytes = denom.as_bytes();
    let well_formed = (3..=128).contains(&bytes.len())
        && bytes[0].is_ascii_alphabetic()
        && bytes[1..]
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || DENOM_EXTRA_CHARS.contains(b));
    if well_formed {
        Ok(())
    } else {
        Err(TypesError::InvalidDenom(denom.to_string()))
    }
}

/// A single (denomination, amount) pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: Amount,
}

impl Coin {
    pub fn new(amount: impl Into<Amount>, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| TypesError::InvalidCoin(s.to_string()))?;
        let (amount, denom) = s.split_at(split);
        let amount: Amount = amount
            .parse()
            .map_err(|_| TypesError::InvalidCoin(s.to_string()))?;
        validate_denom(denom)?;
        Ok(Coin::new(amount, denom))
    }
}

/// A sorted, de-duplicated bundle of non-zero coins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coin>", into = "Vec<Coin>")]
pub struct Coins(Vec<Coin>);

impl Coins {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Build a bundle, dropping zero amounts and sorting by denomination.
    ///
    /// Fails on an invalid or duplicated denomination.
    pub fn new(coins: Vec<Coin>) -> Result<Self, TypesError> {
        let mut by_denom = BTreeMap::new();
        for coin in coins {
            validate_denom(&coin.denom)?;
            if by_denom.insert(coin.denom.clone(), coin.amount).is_some() {
                return Err(TypesError::DuplicateDenom(coin.denom));
            }
        }
        Ok(Self::from_sorted_map(by_denom))
    }

    /// Single-coin bundle. A zero amount yields the empty bundle.
    pub fn from_coin(coin: Coin) -> Result<Self, TypesError> {
        Self::new(vec![coin])
    }

    fn from_sorted_map(map: BTreeMap<String, Amount>) -> Self {
        Self(
            map.into_iter()
                .filter(|(_, amount)| !amount.is_zero())
                .map(|(denom, amount)| Coin { denom, amount })
                .collect(),
        )
    }

    fn to_map(&self) -> BTreeMap<String, Amount> {
        self.0
            .iter()
            .map(|c| (c.denom.clone(), c.amount))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Coin] {
        &self.0
    }

    /// Amount of `denom` held in this bundle, zero when absent.
    pub fn amount_of(&self, denom: &str) -> Amount {
        self.0
            .binary_search_by(|c| c.denom.as_str().cmp(denom))
            .map(|i| self.0[i].amount)
            .unwrap_or(Amount::ZERO)
    }

    pub fn denoms(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|c| c.denom.as_str())
    }

    pub fn checked_add(&self, other: &Coins) -> Result<Coins, TypesError> {
        let mut map = self.to_map();
        for coin in &other.0 {
            let entry = map.entry(coin.denom.clone()).or_insert(Amount::ZERO);
            *entry = entry.checked_add(coin.amount).ok_or(TypesError::Overflow)?;
        }
        Ok(Self::from_sorted_map(map))
    }

    /// `self − other`; fails if any denomination would go negative.
    pub fn checked_sub(&self, other: &Coins) -> Result<Coins, TypesError> {
        let mut map = self.to_map();
        for coin in &other.0 {
            let held = map.get(&coin.denom).copied().unwrap_or(Amount::ZERO);
            let rest = held
                .checked_sub(coin.amount)
                .ok_or_else(|| TypesError::InsufficientCoins {
                    have: self.to_string(),
                    need: other.to_string(),
                })?;
            map.insert(coin.denom.clone(), rest);
        }
        Ok(Self::from_sorted_map(map))
    }

    /// True when every coin of `other` is covered by `self`.
    pub fn is_all_gte(&self, other: &Coins) -> bool {
        other.0.iter().all(|c| self.amount_of(&c.denom) >= c.amount)
    }

    /// Apply `f` to every amount, keeping the denomination; zero results are dropped.
    pub fn try_map_amounts<F>(&self, mut f: F) -> Result<Coins, TypesError>
    where
        F: FnMut(Amount) -> Result<Amount, TypesError>,
    {
        let mut out = Vec::with_capacity(self.0.len());
        for coin in &self.0 {
            let amount = f(coin.amount)?;
            if !amount.is_zero() {
                out.push(Coin {
                    denom: coin.denom.clone(),
                    amount,
                });
            }
        }
        Ok(Self(out))
    }

    /// Every amount multiplied by `rate`, truncated toward zero.
    pub fn mul_dec_truncate(&self, rate: Decimal) -> Result<Coins, TypesError> {
        self.try_map_amounts(|a| a.mul_dec_truncate(rate))
    }

    /// Every amount multiplied by `rate`, rounded half away from zero.
    pub fn mul_dec_round(&self, rate: Decimal) -> Result<Coins, TypesError> {
        self.try_map_amounts(|a| a.mul_dec_round(rate))
    }
}

impl TryFrom<Vec<Coin>> for Coins {
    type Error = TypesError;

    fn try_from(coins: Vec<Coin>) -> Result<Self, Self::Error> {
        Self::new(coins)
    }
}

impl From<Coins> for Vec<Coin> {
    fn from(coins: Coins) -> Self {
        coins.0
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, coin) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{coin}")?;
        }
        Ok(())
    }
}

impl FromStr for Coins {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::empty());
        }
        let coins = s
            .split(',')
            .map(Coin::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(coins)
    }
}

/// A coin with a fixed-point amount, used by accumulators that must not lose
/// fractions (the community pool).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecCoin {
    pub denom: String,
    pub amount: Decimal,
}

/// A sorted bundle of non-zero [`DecCoin`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecCoins(Vec<DecCoin>);

impl DecCoins {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DecCoin> {
        self.0.iter()
    }

    pub fn amount_of(&self, denom: &str) -> Decimal {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Convert whole coins into decimal coins.
    pub fn from_coins(coins: &Coins) -> Result<Self, TypesError> {
        Self::empty().checked_add_coins(coins)
    }

    /// Add whole coins to this accumulator.
    pub fn checked_add_coins(&self, coins: &Coins) -> Result<Self, TypesError> {
        let mut map: BTreeMap<String, Decimal> = self
            .0
            .iter()
            .map(|c| (c.denom.clone(), c.amount))
            .collect();
        for coin in coins {
            let whole = amount_to_decimal(coin.amount)?;
            let entry = map.entry(coin.denom.clone()).or_insert(Decimal::ZERO);
            *entry = entry.checked_add(whole)?;
        }
        Ok(Self(
            map.into_iter()
                .filter(|(_, amount)| !amount.is_zero())
                .map(|(denom, amount)| DecCoin { denom, amount })
                .collect(),
        ))
    }
}

fn amount_to_decimal(amount: Amount) -> Result<Decimal, TypesError> {
    let raw = amount.raw();
    if raw > primitive_types::U256::from(i128::MAX as u128) {
        return Err(TypesError::Overflow);
    }
    let whole = raw.as_u128() as i128;
    whole
        .checked_mul(Decimal::PRECISION_SCALE as i128)
        .map(Decimal::from_atomics)
        .ok_or(TypesError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins(s: &str) -> Coins {
        s.parse().unwrap()
    }

    #[test]
    fn new_sorts_and_drops_zero() {
        let c = Coins::new(vec![
            Coin::new(5u128, "usdr"),
            Coin::new(0u128, "ukrw"),
            Coin::new(7u128, "uluna"),
        ])
        .unwrap();
        assert_eq!(c.to_string(), "7uluna,5usdr");
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn new_rejects_duplicates_and_bad_denoms() {
        assert!(matches!(
            Coins::new(vec![Coin::new(1u128, "uluna"), Coin::new(2u128, "uluna")]),
            Err(TypesError::DuplicateDenom(_))
        ));
        assert!(Coins::new(vec![Coin::new(1u128, "1x")]).is_err());
        assert!(Coins::new(vec![Coin::new(1u128, "ab")]).is_err());
        assert!(Coins::new(vec![Coin::new(1u128, "ibc/ABCDEF")]).is_ok());
    }

    #[test]
    fn add_and_sub() {
        let a = coins("100uluna,50usdr");
        let b = coins("30uluna,50usdr");
        assert_eq!(a.checked_add(&b).unwrap(), coins("130uluna,100usdr"));
        assert_eq!(a.checked_sub(&b).unwrap(), coins("70uluna"));
        assert!(b.checked_sub(&a).is_err());
        assert!(a.checked_sub(&coins("1ukrw")).is_err());
    }

    #[test]
    fn amount_of_and_gte() {
        let a = coins("100uluna,50usdr");
        assert_eq!(a.amount_of("usdr"), Amount::from_u128(50));
        assert_eq!(a.amount_of("ukrw"), Amount::ZERO);
        assert!(a.is_all_gte(&coins("100uluna")));
        assert!(!a.is_all_gte(&coins("101uluna")));
        assert!(a.is_all_gte(&Coins::empty()));
    }

    #[test]
    fn parse_round_trips_display() {
        let a = coins("1000000uluna,5usdr");
        assert_eq!(a.to_string().parse::<Coins>().unwrap(), a);
        assert!("".parse::<Coins>().unwrap().is_empty());
        assert!("uluna".parse::<Coins>().is_err());
        assert!("10".parse::<Coins>().is_err());
    }

    #[test]
    fn scaled_bundles_drop_zero_components() {
        let a = coins("1000uluna,100usdr");
        assert_eq!(
            a.mul_dec_truncate("0.005".parse().unwrap()).unwrap(),
            coins("5uluna")
        );
    }

    #[test]
    fn dec_coins_accumulate() {
        let pool = DecCoins::from_coins(&coins("41uluna")).unwrap();
        let pool = pool.checked_add_coins(&coins("9uluna,3usdr")).unwrap();
        assert_eq!(pool.amount_of("uluna"), "50".parse().unwrap());
        assert_eq!(pool.amount_of("usdr"), "3".parse().unwrap());
    }

    #[test]
    fn serde_rejects_unsorted_duplicates() {
        let json = r#"[{"denom":"uluna","amount":"1"},{"denom":"uluna","amount":"2"}]"#;
        assert!(serde_json::from_str::<Coins>(json).is_err());
        let json = r#"[{"denom":"usdr","amount":"1"},{"denom":"uluna","amount":"2"}]"#;
        let parsed: Coins = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.to_string(), "2uluna,1usdr");
    }
}
