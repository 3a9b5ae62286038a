//! In-line tax deduction for a single taxable transfer.

use crate::compute::compute_tax;
use crate::context::TaxContext;
use crate::error::TaxError;
use crate::split::split_taxes;
use lunc_store::TaxState;
use lunc_types::event::{ATTR_REVERSE_CHARGE, ATTR_TAX_AMOUNT, EVENT_TAX_PAYMENT};
use lunc_types::{module, AccAddress, Coins, Event};
use tracing::{debug, warn};

/// `tax_payment` event for tax collected by the message layer or the settler.
pub fn tax_payment_event(reverse_charge: bool, taxes: &Coins) -> Event {
    Event::new(EVENT_TAX_PAYMENT)
        .add_attribute(ATTR_REVERSE_CHARGE, reverse_charge)
        .add_attribute(ATTR_TAX_AMOUNT, taxes)
}

/// `tax_payment` event for a message whose tax the ante step already charged.
pub fn passthrough_event() -> Event {
    Event::new(EVENT_TAX_PAYMENT).add_attribute(ATTR_REVERSE_CHARGE, false)
}

/// Record that the message layer is not collecting tax for this message.
pub fn pass_through(ctx: &mut TaxContext) {
    ctx.emit(passthrough_event());
}

/// Charge burn tax on `amount` to `payer` and return what the inner handler
/// should move instead of `amount`.
///
/// Collected taxes go to the fee collector, are split right away and then
/// recorded as epoch proceeds. A failure at any step leaves the caller to
/// discard the transaction's state.
pub fn deduct_tax<S: TaxState + ?Sized>(
    state: &mut S,
    ctx: &mut TaxContext,
    payer: &AccAddress,
    amount: &Coins,
) -> Result<Coins, TaxError> {
    if !ctx.reverse_charge {
        pass_through(ctx);
        return Ok(amount.clone());
    }

    let taxes = compute_tax(state.get_tax_rate(), amount)?;
    if taxes.is_empty() {
        return Ok(amount.clone());
    }

    collect(state, payer, &taxes)?;
    ctx.emit(tax_payment_event(true, &taxes));
    debug!(payer = %payer, taxes = %taxes, "deducted burn tax");

    Ok(amount.checked_sub(&taxes)?)
}

/// Move `taxes` from `payer` into the fee collector, split them and record
/// the proceeds.
pub fn collect<S: TaxState + ?Sized>(
    state: &mut S,
    payer: &AccAddress,
    taxes: &Coins,
) -> Result<(), TaxError> {
    state
        .send_coins_from_account_to_module(payer, module::FEE_COLLECTOR, taxes)
        .map_err(|err| {
            warn!(payer = %payer, taxes = %taxes, error = %err, "tax payer cannot cover burn tax");
            TaxError::from(err)
        })?;
    split_taxes(state, taxes)?;
    state.record_epoch_tax_proceeds(taxes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunc_nullables::NullChain;
    use lunc_store::{BankKeeper, TreasuryKeeper};
    use lunc_types::Decimal;

    fn addr(n: u8) -> AccAddress {
        AccAddress::new(vec![n; 20]).unwrap()
    }

    fn coins(s: &str) -> Coins {
        s.parse().unwrap()
    }

    fn chain() -> NullChain {
        NullChain::new()
            .with_balance(&addr(1), "1000000uluna")
            .with_tax_rate(Decimal::permille(5))
    }

    #[test]
    fn deducts_and_burns_at_zero_split() {
        let mut state = chain();
        let mut ctx = TaxContext::default();
        let net = deduct_tax(&mut state, &mut ctx, &addr(1), &coins("1000000uluna")).unwrap();

        assert_eq!(net, coins("995000uluna"));
        assert_eq!(state.balance_of(&addr(1), "uluna"), 995_000);
        assert_eq!(state.module_balances(module::BURN), coins("5000uluna"));
        assert_eq!(state.epoch_tax_proceeds(), coins("5000uluna"));

        let event = &ctx.events()[0];
        assert_eq!(event.kind, EVENT_TAX_PAYMENT);
        assert_eq!(event.attribute(ATTR_REVERSE_CHARGE), Some("true"));
        assert_eq!(event.attribute(ATTR_TAX_AMOUNT), Some("5000uluna"));
    }

    #[test]
    fn reverse_charge_off_passes_through() {
        let mut state = chain();
        let before = state.clone();
        let mut ctx = TaxContext::new(false);
        let net = deduct_tax(&mut state, &mut ctx, &addr(1), &coins("1000000uluna")).unwrap();

        assert_eq!(net, coins("1000000uluna"));
        assert_eq!(state, before);
        assert_eq!(ctx.events(), &[passthrough_event()]);
        assert_eq!(ctx.events()[0].attribute(ATTR_TAX_AMOUNT), None);
    }

    #[test]
    fn dust_amount_is_untaxed() {
        let mut state = chain();
        let before = state.clone();
        let mut ctx = TaxContext::default();
        let net = deduct_tax(&mut state, &mut ctx, &addr(1), &coins("199uluna")).unwrap();
        assert_eq!(net, coins("199uluna"));
        assert_eq!(state, before);
        assert!(ctx.events().is_empty());
    }

    #[test]
    fn insolvent_payer_fails() {
        let mut state = NullChain::new()
            .with_balance(&addr(2), "10uluna")
            .with_tax_rate(Decimal::permille(5));
        let mut ctx = TaxContext::default();
        let err = deduct_tax(&mut state, &mut ctx, &addr(2), &coins("1000000uluna")).unwrap_err();
        assert!(matches!(err, TaxError::InsufficientFunds { .. }));
        assert!(ctx.events().is_empty());
    }

    #[test]
    fn multi_denom_transfer_taxes_each_denom() {
        let mut state = chain().with_balance(&addr(1), "20000usdr");
        let mut ctx = TaxContext::default();
        let net = deduct_tax(&mut state, &mut ctx, &addr(1), &coins("20000uluna,20000usdr")).unwrap();
        assert_eq!(net, coins("19900uluna,19900usdr"));
        assert_eq!(state.module_balances(module::BURN), coins("100uluna,100usdr"));
    }
}
