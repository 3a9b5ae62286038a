//! Fee check run before a transaction's messages execute.
//!
//! When the fee attached to a transaction pays for both gas and the burn tax
//! of its messages, the tax is deferred to the settler and the message layer
//! is told not to charge it again (`reverse_charge = false`). Otherwise the
//! message layer charges tax in-line.

use crate::context::{TaxContext, KEY_REVERSE_CHARGE, KEY_TAX_DUE, KEY_TAX_PAYER};
use crate::error::TaxError;
use crate::params::get_params;
use lunc_store::TaxState;
use lunc_types::{AccAddress, Amount, Coin, Coins, TaxParams};
use tracing::debug;

/// Fee terms of a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeeInfo {
    pub payer: AccAddress,
    pub fee: Coins,
    pub gas_limit: u64,
}

/// Result of the fee check: the context for the message layer plus the part
/// of the fee that pays for gas.
#[derive(Clone, Debug)]
pub struct AntePlan {
    pub context: TaxContext,
    pub gas_fee: Coins,
}

/// `ceil(price × gas_limit)` for every accepted fee denomination.
pub fn required_gas_fees(params: &TaxParams, gas_limit: u64) -> Result<Coins, TaxError> {
    let limit = Amount::from(gas_limit);
    let mut fees = Vec::with_capacity(params.gas_prices.len());
    for price in &params.gas_prices {
        fees.push(Coin {
            denom: price.denom.clone(),
            amount: limit.mul_dec_ceil(price.amount)?,
        });
    }
    Ok(Coins::new(fees)?)
}

/// A fee pays for gas when it meets the requirement in at least one
/// denomination. No requirement is always met.
pub fn covers_gas(fee: &Coins, required: &Coins) -> bool {
    required.is_empty() || required.iter().any(|c| fee.amount_of(&c.denom) >= c.amount)
}

/// Decide who collects `taxes`, the total burn tax of the transaction's
/// taxable messages.
pub fn prepare<S: TaxState + ?Sized>(
    state: &S,
    fee: &FeeInfo,
    taxes: &Coins,
) -> Result<AntePlan, TaxError> {
    let params = get_params(state)?;
    let required = required_gas_fees(&params, fee.gas_limit)?;

    if !taxes.is_empty() && fee.fee.is_all_gte(taxes) {
        let gas_fee = fee.fee.checked_sub(taxes)?;
        if covers_gas(&gas_fee, &required) {
            let mut context = TaxContext::new(false);
            context.defer(fee.payer.clone(), taxes.clone());
            debug!(
                { KEY_TAX_PAYER } = %fee.payer,
                { KEY_TAX_DUE } = %taxes,
                { KEY_REVERSE_CHARGE } = false,
                "fee covers burn tax, deferring"
            );
            return Ok(AntePlan { context, gas_fee });
        }
    }

    debug!(
        payer = %fee.payer,
        fee = %fee.fee,
        taxes = %taxes,
        { KEY_REVERSE_CHARGE } = true,
        "burn tax charged by message layer"
    );
    Ok(AntePlan {
        context: TaxContext::new(true),
        gas_fee: fee.fee.clone(),
    })
}
