//! End-of-block destruction of the burn module's holdings.

use crate::error::TaxError;
use lunc_store::TaxState;
use lunc_types::{module, Coins};
use tracing::info;

/// Burn everything the burn module holds; returns what was destroyed.
pub fn sweep_burn_account<S: TaxState + ?Sized>(state: &mut S) -> Result<Coins, TaxError> {
    let held = state.module_balances(module::BURN);
    if held.is_empty() {
        return Ok(held);
    }
    state.burn_coins(module::BURN, &held)?;
    info!(burned = %held, "swept burn account");
    Ok(held)
}
