//! Tax middlewares for the bank, market and wasm message families.

use crate::msgs::{decode_address, Msg};
use crate::multisend;
use crate::router::{Middleware, MsgResponse, Next};
use lunc_store::TaxState;
use lunc_tax::context::{KEY_WASM_BALANCE, KEY_WASM_FUNDS};
use lunc_tax::{deduct_tax, pass_through, TaxContext, TaxError, TaxStage};
use lunc_types::Coins;
use tracing::debug;

/// Tax a single-payer message and return the message to hand on.
///
/// Exempt messages and messages whose tax the ante step already charged are
/// returned unchanged; otherwise the payer is charged and the message carries
/// the net amount.
fn apply_tax<S: TaxState + ?Sized>(state: &mut S, ctx: &mut TaxContext, msg: Msg) -> Result<Msg, TaxError> {
    let taxable = match msg.taxable()? {
        Some(taxable) => taxable,
        None => return Ok(msg),
    };
    if taxable.exemption.applies(state) {
        ctx.advance(TaxStage::Exempted)?;
        return Ok(msg);
    }
    let net = deduct_tax(state, ctx, &taxable.payer, &taxable.coins)?;
    if !ctx.reverse_charge {
        ctx.advance(TaxStage::Passthrough)?;
        return Ok(msg);
    }
    ctx.advance(TaxStage::Taxed)?;
    Ok(msg.with_net_amount(net))
}

/// `BankSend` and `BankMultiSend`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BankTax;

impl<S: TaxState + ?Sized> Middleware<S> for BankTax {
    fn name(&self) -> &'static str {
        "bank_tax"
    }

    fn handle(
        &self,
        state: &mut S,
        ctx: &mut TaxContext,
        msg: Msg,
        next: Next<'_, S>,
    ) -> Result<MsgResponse, TaxError> {
        match msg {
            Msg::BankSend { .. } => {
                let msg = apply_tax(state, ctx, msg)?;
                next.run(state, ctx, msg)
            }
            Msg::BankMultiSend { inputs, outputs } => {
                if !multisend::is_tainted(state, &inputs, &outputs)? {
                    ctx.advance(TaxStage::Exempted)?;
                    return next.run(state, ctx, Msg::BankMultiSend { inputs, outputs });
                }
                if !ctx.reverse_charge {
                    pass_through(ctx);
                    ctx.advance(TaxStage::Passthrough)?;
                    return next.run(state, ctx, Msg::BankMultiSend { inputs, outputs });
                }

                let taxed: Vec<String> = multisend::taxed_inputs(state, &inputs, &outputs)?
                    .into_iter()
                    .map(|i| i.address.clone())
                    .collect();
                let mut input_taxes = Vec::with_capacity(inputs.len());
                for input in &inputs {
                    if taxed.contains(&input.address) {
                        let payer = decode_address("inputs.address", &input.address)?;
                        let net = deduct_tax(state, ctx, &payer, &input.coins)?;
                        input_taxes.push(input.coins.checked_sub(&net)?);
                    } else {
                        input_taxes.push(Coins::empty());
                    }
                }
                let (inputs, outputs) =
                    multisend::rewrite(state.get_tax_rate(), inputs, outputs, &input_taxes)?;
                ctx.advance(TaxStage::Taxed)?;
                next.run(state, ctx, Msg::BankMultiSend { inputs, outputs })
            }
            other => next.run(state, ctx, other),
        }
    }
}

/// `MarketSwapSend`: the offer coin is taxed before the swap is simulated.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarketTax;

impl<S: TaxState + ?Sized> Middleware<S> for MarketTax {
    fn name(&self) -> &'static str {
        "market_tax"
    }

    fn handle(
        &self,
        state: &mut S,
        ctx: &mut TaxContext,
        msg: Msg,
        next: Next<'_, S>,
    ) -> Result<MsgResponse, TaxError> {
        match msg {
            Msg::MarketSwapSend { .. } => {
                let msg = apply_tax(state, ctx, msg)?;
                next.run(state, ctx, msg)
            }
            other => next.run(state, ctx, other),
        }
    }
}

/// Contract execution and instantiation. Records the funds forwarded to the
/// contract and, for execution, the contract's balance beforehand.
#[derive(Clone, Copy, Debug, Default)]
pub struct WasmTax;

impl<S: TaxState + ?Sized> Middleware<S> for WasmTax {
    fn name(&self) -> &'static str {
        "wasm_tax"
    }

    fn handle(
        &self,
        state: &mut S,
        ctx: &mut TaxContext,
        msg: Msg,
        next: Next<'_, S>,
    ) -> Result<MsgResponse, TaxError> {
        match msg {
            Msg::WasmExecuteContract { ref contract, .. } => {
                let contract = decode_address("contract", contract)?;
                ctx.wasm_balance = Some(state.get_all_balances(&contract));
                let msg = apply_tax(state, ctx, msg)?;
                if let Msg::WasmExecuteContract { funds, .. } = &msg {
                    ctx.wasm_funds = Some(funds.clone());
                }
                debug!(
                    contract = %contract,
                    { KEY_WASM_FUNDS } = ?ctx.wasm_funds,
                    { KEY_WASM_BALANCE } = ?ctx.wasm_balance,
                    "wasm execute"
                );
                next.run(state, ctx, msg)
            }
            Msg::WasmInstantiateContract { .. } | Msg::WasmInstantiateContract2 { .. } => {
                let msg = apply_tax(state, ctx, msg)?;
                match &msg {
                    Msg::WasmInstantiateContract { funds, .. }
                    | Msg::WasmInstantiateContract2 { funds, .. } => {
                        ctx.wasm_funds = Some(funds.clone());
                    }
                    _ => {}
                }
                debug!({ KEY_WASM_FUNDS } = ?ctx.wasm_funds, "wasm instantiate");
                next.run(state, ctx, msg)
            }
            other => next.run(state, ctx, other),
        }
    }
}
