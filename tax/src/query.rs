//! Read-only queries over the tax state.

use crate::compute::compute_tax;
use crate::error::TaxError;
use crate::params::get_params;
use lunc_store::TaxState;
use lunc_types::{Coins, DecCoin, Decimal, TaxParams};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum TaxQuery {
    Params,
    BurnTaxRate,
    ComputeTax { amount: Coins },
    GasPrices,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaxQueryResponse {
    Params(TaxParams),
    Rate(Decimal),
    Coins(Coins),
    GasPrices(Vec<DecCoin>),
}

pub fn query<S: TaxState + ?Sized>(state: &S, query: &TaxQuery) -> Result<TaxQueryResponse, TaxError> {
    Ok(match query {
        TaxQuery::Params => TaxQueryResponse::Params(get_params(state)?),
        TaxQuery::BurnTaxRate => TaxQueryResponse::Rate(state.get_tax_rate()),
        TaxQuery::ComputeTax { amount } => {
            TaxQueryResponse::Coins(compute_tax(state.get_tax_rate(), amount)?)
        }
        TaxQuery::GasPrices => TaxQueryResponse::GasPrices(get_params(state)?.gas_prices),
    })
}
