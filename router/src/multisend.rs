//! Symmetric rewrite of a tainted multi-send.
//!
//! A multi-send is tainted when any of its input or output addresses is off
//! the exemption list. Each non-exempt input pays tax on its coins. The same
//! per-denomination total is then taken off the outputs: every output starts
//! with a deduction of `tax(coins)`, and the difference left by rounding is
//! settled against the outputs in message order. The bank's own check,
//! `Σ inputs = Σ outputs`, therefore holds on the rewritten message.

use crate::msgs::{decode_address, Input, Output};
use lunc_store::TaxState;
use lunc_tax::{compute_tax, has_pair_exemption, TaxError};
use lunc_types::{Amount, Coin, Coins, Decimal, TypesError};
use std::collections::BTreeMap;

fn is_exempt<S: TaxState + ?Sized>(state: &S, field: &str, address: &str) -> Result<bool, TaxError> {
    let address = decode_address(field, address)?;
    Ok(has_pair_exemption(state, &[&address]))
}

/// True when any party to the multi-send is not exempt.
pub fn is_tainted<S: TaxState + ?Sized>(
    state: &S,
    inputs: &[Input],
    outputs: &[Output],
) -> Result<bool, TaxError> {
    for input in inputs {
        if !is_exempt(state, "inputs.address", &input.address)? {
            return Ok(true);
        }
    }
    for output in outputs {
        if !is_exempt(state, "outputs.address", &output.address)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Inputs that pay tax: the non-exempt ones of a tainted multi-send.
pub fn taxed_inputs<'a, S: TaxState + ?Sized>(
    state: &S,
    inputs: &'a [Input],
    outputs: &[Output],
) -> Result<Vec<&'a Input>, TaxError> {
    if !is_tainted(state, inputs, outputs)? {
        return Ok(Vec::new());
    }
    let mut taxed = Vec::new();
    for input in inputs {
        if !is_exempt(state, "inputs.address", &input.address)? {
            taxed.push(input);
        }
    }
    Ok(taxed)
}

pub fn sum_coins<'a>(bundles: impl IntoIterator<Item = &'a Coins>) -> Result<Coins, TaxError> {
    let mut total = Coins::empty();
    for coins in bundles {
        total = total.checked_add(coins)?;
    }
    Ok(total)
}

/// Rewrite inputs and outputs after `input_taxes[i]` was taken from input `i`.
///
/// Fails with `InconsistentMultiSend` when the rewritten sides differ, which
/// also covers a multi-send that was unbalanced to begin with.
pub fn rewrite(
    rate: Decimal,
    inputs: Vec<Input>,
    outputs: Vec<Output>,
    input_taxes: &[Coins],
) -> Result<(Vec<Input>, Vec<Output>), TaxError> {
    let total_tax = sum_coins(input_taxes)?;

    let mut deductions: Vec<BTreeMap<String, Amount>> = Vec::with_capacity(outputs.len());
    for output in &outputs {
        let tax = compute_tax(rate, &output.coins)?;
        deductions.push(tax.iter().map(|c| (c.denom.clone(), c.amount)).collect());
    }

    let mut denoms: Vec<String> = total_tax.denoms().map(str::to_string).collect();
    for deduction in &deductions {
        denoms.extend(deduction.keys().cloned());
    }
    denoms.sort();
    denoms.dedup();

    for denom in &denoms {
        reconcile(denom, total_tax.amount_of(denom), &outputs, &mut deductions)?;
    }

    let mut new_inputs = Vec::with_capacity(inputs.len());
    for (i, input) in inputs.into_iter().enumerate() {
        let tax = input_taxes.get(i).cloned().unwrap_or_default();
        new_inputs.push(Input {
            coins: input.coins.checked_sub(&tax)?,
            address: input.address,
        });
    }

    let mut new_outputs = Vec::with_capacity(outputs.len());
    for (output, deduction) in outputs.into_iter().zip(deductions) {
        let deduction = Coins::new(
            deduction
                .into_iter()
                .map(|(denom, amount)| Coin { denom, amount })
                .collect(),
        )?;
        new_outputs.push(Output {
            coins: output.coins.checked_sub(&deduction)?,
            address: output.address,
        });
    }

    let sum_in = sum_coins(new_inputs.iter().map(|i| &i.coins))?;
    let sum_out = sum_coins(new_outputs.iter().map(|o| &o.coins))?;
    if sum_in != sum_out {
        return Err(TaxError::InconsistentMultiSend {
            inputs: sum_in.to_string(),
            outputs: sum_out.to_string(),
        });
    }
    Ok((new_inputs, new_outputs))
}

/// Adjust the output deductions of `denom` until they add up to `target`.
fn reconcile(
    denom: &str,
    target: Amount,
    outputs: &[Output],
    deductions: &mut [BTreeMap<String, Amount>],
) -> Result<(), TaxError> {
    let current = deductions
        .iter()
        .try_fold(Amount::ZERO, |acc, d| {
            acc.checked_add(d.get(denom).copied().unwrap_or(Amount::ZERO))
        })
        .ok_or(TypesError::Overflow)?;

    if current > target {
        let mut excess = current.saturating_sub(target);
        for deduction in deductions.iter_mut() {
            if excess.is_zero() {
                break;
            }
            if let Some(taken) = deduction.get_mut(denom) {
                let give_back = excess.min(*taken);
                *taken = taken.saturating_sub(give_back);
                excess = excess.saturating_sub(give_back);
            }
        }
    } else if current < target {
        let mut short = target.saturating_sub(current);
        for (output, deduction) in outputs.iter().zip(deductions.iter_mut()) {
            if short.is_zero() {
                break;
            }
            let entry = deduction.entry(denom.to_string()).or_insert(Amount::ZERO);
            let room = output.coins.amount_of(denom).saturating_sub(*entry);
            let take = short.min(room);
            *entry = entry.checked_add(take).ok_or(TypesError::Overflow)?;
            short = short.saturating_sub(take);
        }
    }
    Ok(())
}
