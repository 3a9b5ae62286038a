//! Tax pipeline parameters.
//!
//! Created at genesis and replaced only by a governance-authorised update.
//! Persisted as a length-prefixed binary blob (bincode) under a single key.

use crate::coin::{validate_denom, DecCoin};
use crate::decimal::Decimal;
use crate::error::TypesError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxParams {
    /// Fraction of a transfer taken as burn tax, in [0, 1].
    pub burn_tax_rate: Decimal,

    /// Minimum per-denomination gas price accepted by the node.
    /// Read by the fee check in the ante step, never by the split.
    pub gas_prices: Vec<DecCoin>,
}

impl TaxParams {
    /// 0.5% burn tax, no gas price floor.
    pub fn classic_defaults() -> Self {
        Self {
            burn_tax_rate: Decimal::permille(5),
            gas_prices: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), TypesError> {
        if self.burn_tax_rate.is_negative() || self.burn_tax_rate > Decimal::ONE {
            return Err(TypesError::InvalidDecimal(format!(
                "burn tax rate must be within [0, 1], got {}",
                self.burn_tax_rate
            )));
        }
        let mut previous: Option<&str> = None;
        for price in &self.gas_prices {
            validate_denom(&price.denom)?;
            if price.amount.is_negative() {
                return Err(TypesError::NegativeAmount(format!(
                    "gas price {}{}",
                    price.amount, price.denom
                )));
            }
            if let Some(prev) = previous {
                if prev >= price.denom.as_str() {
                    return Err(TypesError::DuplicateDenom(price.denom.clone()));
                }
            }
            previous = Some(&price.denom);
        }
        Ok(())
    }

    /// Gas price for `denom`, if the node accepts fees in it.
    pub fn gas_price(&self, denom: &str) -> Option<Decimal> {
        self.gas_prices
            .iter()
            .find(|p| p.denom == denom)
            .map(|p| p.amount)
    }

    pub fn encode(&self) -> Result<Vec<u8>, TypesError> {
        bincode::serialize(self).map_err(|e| TypesError::Serialization(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, TypesError> {
        bincode::deserialize(bytes).map_err(|e| TypesError::Serialization(e.to_string()))
    }
}

impl Default for TaxParams {
    fn default() -> Self {
        Self::classic_defaults()
    }
}
