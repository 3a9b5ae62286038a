//! Partition of collected taxes between the burn, oracle and community sinks.
//!
//! Taxes enter this module resident in the fee collector. Out of `taxes`:
//!
//! - `delta = round(taxes × S)` is diverted from the burn sink,
//! - `community = round(delta × C')` goes to the distribution module and the
//!   community pool, where `C' = C × (O / (C × O + 1 − C))`,
//! - `oracle = round((delta − community) × O)` goes to the oracle module,
//! - `taxes − delta` moves to the burn module,
//! - whatever is left of `delta` stays in the fee collector.
//!
//! `S`, `O` and `C` are the burn split, oracle split and community tax rates.
//! All three roundings are half away from zero.

use crate::error::TaxError;
use lunc_store::TaxState;
use lunc_types::{module, Coins, Decimal};
use tracing::{debug, error};

/// Where each part of a split ended up.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitOutcome {
    /// Moved to the burn module, destroyed by the end-of-block sweep.
    pub burned: Coins,
    pub oracle: Coins,
    pub community: Coins,
    /// Left in the fee collector for the regular distribution path.
    pub retained: Coins,
}

impl SplitOutcome {
    /// Sum of every part; equals the split input.
    pub fn total(&self) -> Result<Coins, TaxError> {
        Ok(self
            .burned
            .checked_add(&self.oracle)?
            .checked_add(&self.community)?
            .checked_add(&self.retained)?)
    }
}

/// Adjusted community rate applied to the diverted amount.
///
/// `C × O + 1 − C` only vanishes at `C = 1, O = 0`; the whole diverted amount
/// then belongs to the community pool.
pub fn adjusted_community_rate(community_tax: Decimal, oracle_split: Decimal) -> Result<Decimal, TaxError> {
    if community_tax.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let co = community_tax.checked_mul(oracle_split)?;
    let denominator = co.checked_add(Decimal::ONE)?.checked_sub(community_tax)?;
    if denominator.is_zero() {
        return Ok(Decimal::ONE);
    }
    Ok(community_tax.checked_mul(oracle_split.checked_quo(denominator)?)?)
}

/// Compute the split of `taxes` under the given rates without moving coins.
pub fn plan_split(
    taxes: &Coins,
    burn_split: Decimal,
    oracle_split: Decimal,
    community_tax: Decimal,
) -> Result<SplitOutcome, TaxError> {
    if !burn_split.is_positive() {
        return Ok(SplitOutcome {
            burned: taxes.clone(),
            ..SplitOutcome::default()
        });
    }

    let delta = taxes.mul_dec_round(burn_split)?;
    let burned = taxes.checked_sub(&delta)?;

    let community_rate = adjusted_community_rate(community_tax, oracle_split)?;
    let community = delta.mul_dec_round(community_rate)?;
    let delta = delta.checked_sub(&community)?;

    let oracle = if oracle_split.is_positive() {
        delta.mul_dec_round(oracle_split)?
    } else {
        Coins::empty()
    };
    let retained = delta.checked_sub(&oracle)?;

    Ok(SplitOutcome {
        burned,
        oracle,
        community,
        retained,
    })
}

/// Split `taxes` held by the fee collector, reading rates from the treasury
/// and distribution keepers, and move each part to its sink.
pub fn split_taxes<S: TaxState + ?Sized>(state: &mut S, taxes: &Coins) -> Result<SplitOutcome, TaxError> {
    let outcome = plan_split(
        taxes,
        state.get_burn_split_rate(),
        state.get_oracle_split_rate(),
        state.get_community_tax(),
    )?;

    let total = outcome.total()?;
    if total != *taxes {
        error!(
            taxes = %taxes,
            split = %total,
            "tax split does not conserve the collected amount"
        );
        return Err(TaxError::InvariantViolated(format!(
            "split of {taxes} sums to {total}"
        )));
    }

    if !outcome.community.is_empty() {
        state.send_coins_from_module_to_module(
            module::FEE_COLLECTOR,
            module::DISTRIBUTION,
            &outcome.community,
        )?;
        let mut fee_pool = state.get_fee_pool();
        fee_pool.community_pool = fee_pool.community_pool.checked_add_coins(&outcome.community)?;
        state.set_fee_pool(fee_pool);
    }

    if !outcome.oracle.is_empty() {
        state.send_coins_from_module_to_module(module::FEE_COLLECTOR, module::ORACLE, &outcome.oracle)?;
    }

    if !outcome.burned.is_empty() {
        state.send_coins_from_module_to_module(module::FEE_COLLECTOR, module::BURN, &outcome.burned)?;
    }

    debug!(
        burned = %outcome.burned,
        oracle = %outcome.oracle,
        community = %outcome.community,
        retained = %outcome.retained,
        "split taxes"
    );
    Ok(outcome)
}
