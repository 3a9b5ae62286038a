//! Parameter storage and the governance update path.
//!
//! The treasury's tax rate is the only value the pipeline reads when it
//! computes tax. The stored params keep `burn_tax_rate` for genesis export
//! and queries; a governance update writes the new rate to both places, so
//! governance is the single lever for the rate.

use crate::error::TaxError;
use lunc_store::{StoreError, TaxState};
use lunc_types::{AccAddress, TaxParams};
use tracing::info;

/// Store key under which the encoded params live.
pub const PARAMS_KEY: &[u8] = &[0x01];

/// Name of the module whose address may update params.
pub const GOV_MODULE: &str = "gov";

pub fn get_params<S: TaxState + ?Sized>(state: &S) -> Result<TaxParams, TaxError> {
    let bytes = state
        .get(PARAMS_KEY)
        .ok_or_else(|| StoreError::NotFound("tax params".into()))?;
    TaxParams::decode(&bytes).map_err(|e| TaxError::Store(StoreError::Serialization(e.to_string())))
}

/// Validate and persist `params`, and point the treasury at the new rate.
pub fn set_params<S: TaxState + ?Sized>(state: &mut S, params: &TaxParams) -> Result<(), TaxError> {
    params
        .validate()
        .map_err(|e| TaxError::InvalidParams(e.to_string()))?;
    let bytes = params
        .encode()
        .map_err(|e| TaxError::Store(StoreError::Serialization(e.to_string())))?;
    state.set(PARAMS_KEY, bytes);
    state.set_tax_rate(params.burn_tax_rate);
    Ok(())
}

/// Gatekeeper for parameter changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamsKeeper {
    authority: AccAddress,
}

impl ParamsKeeper {
    pub fn new(authority: AccAddress) -> Self {
        Self { authority }
    }

    pub fn authority(&self) -> &AccAddress {
        &self.authority
    }

    /// Replace the params; only the configured authority may do so.
    pub fn update_params<S: TaxState + ?Sized>(
        &self,
        state: &mut S,
        sender: &AccAddress,
        params: TaxParams,
    ) -> Result<(), TaxError> {
        if *sender != self.authority {
            return Err(TaxError::Unauthorized {
                expected: self.authority.to_string(),
                got: sender.to_string(),
            });
        }
        set_params(state, &params)?;
        info!(
            burn_tax_rate = %params.burn_tax_rate,
            gas_prices = params.gas_prices.len(),
            "tax params updated"
        );
        Ok(())
    }
}

impl Default for ParamsKeeper {
    /// Governance module account as authority.
    fn default() -> Self {
        Self::new(AccAddress::module(GOV_MODULE))
    }
}
