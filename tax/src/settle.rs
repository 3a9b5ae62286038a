//! Deferred collection of tax that the ante step fixed before execution.

use crate::collector::tax_payment_event;
use crate::context::{TaxContext, KEY_TAX_PAYER};
use crate::error::TaxError;
use crate::split::split_taxes;
use lunc_store::TaxState;
use lunc_types::Coins;
use tracing::debug;

/// Collect `tax_due` from `tax_payer` once the transaction's messages have
/// run. Does nothing when execution failed or nothing is due.
///
/// The due amount is final: it goes straight through the fee deduction path
/// without being recomputed. Returns the amount collected.
pub fn settle<S: TaxState + ?Sized>(
    state: &mut S,
    ctx: &mut TaxContext,
    succeeded: bool,
) -> Result<Option<Coins>, TaxError> {
    if !succeeded {
        return Ok(None);
    }
    let due = match ctx.tax_due.take() {
        Some(due) if !due.is_empty() => due,
        _ => return Ok(None),
    };

    let payer = ctx
        .tax_payer
        .clone()
        .ok_or_else(|| TaxError::UnknownAddress(format!("{KEY_TAX_PAYER} not set")))?;
    if !state.has_account(&payer) {
        return Err(TaxError::UnknownAddress(payer.to_string()));
    }

    state.deduct_fees(&payer, &due)?;
    split_taxes(state, &due)?;
    state.record_epoch_tax_proceeds(&due)?;
    ctx.emit(tax_payment_event(false, &due));

    debug!(payer = %payer, taxes = %due, "settled deferred tax");
    Ok(Some(due))
}
