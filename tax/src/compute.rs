//! Burn tax amount for a bundle of coins.

use crate::error::TaxError;
use lunc_types::{Coins, Decimal};

/// `floor(amount × rate)` per denomination; denominations that round to zero
/// are dropped. A zero rate taxes nothing and a rate of one or more taxes
/// everything.
pub fn compute_tax(rate: Decimal, amount: &Coins) -> Result<Coins, TaxError> {
    if !rate.is_positive() {
        return Ok(Coins::empty());
    }
    if rate >= Decimal::ONE {
        return Ok(amount.clone());
    }
    Ok(amount.mul_dec_truncate(rate)?)
}
