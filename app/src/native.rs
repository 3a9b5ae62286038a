//! Native message handlers run after the tax middlewares.
//!
//! These perform the value movement of each message against the bank. Swap
//! pricing and contract execution belong to other modules: a swap-send only
//! escrows its offer coin in the market module, and a contract call only
//! transfers its funds to the contract address.

use lunc_router::msgs::{decode_address, Msg};
use lunc_router::multisend::sum_coins;
use lunc_router::{Input, MsgHandler, MsgResponse, Output};
use lunc_store::TaxState;
use lunc_tax::TaxError;
use lunc_types::{module, AccAddress, Amount, Coin, Coins, Event};
use sha2::{Digest, Sha256};

pub const EVENT_TRANSFER: &str = "transfer";
pub const EVENT_SWAP: &str = "swap";
pub const EVENT_INSTANTIATE: &str = "instantiate";
pub const EVENT_EXECUTE: &str = "execute";

fn transfer_event(sender: &AccAddress, recipient: &AccAddress, amount: &Coins) -> Event {
    Event::new(EVENT_TRANSFER)
        .add_attribute("sender", sender)
        .add_attribute("recipient", recipient)
        .add_attribute("amount", amount)
}

/// Address of a contract created by `sender` from `code_id`.
///
/// With a salt the address is predictable from (sender, code, salt); without
/// one it also depends on the label.
pub fn contract_address(sender: &AccAddress, code_id: u64, label: &str, salt: Option<&[u8]>) -> AccAddress {
    let mut hasher = Sha256::new();
    hasher.update(b"wasm_contract");
    hasher.update(sender.as_bytes());
    hasher.update(code_id.to_be_bytes());
    match salt {
        Some(salt) => {
            hasher.update(b"salt");
            hasher.update(salt);
        }
        None => hasher.update(label.as_bytes()),
    }
    // 32-byte digest is always a valid contract address length.
    AccAddress::new(hasher.finalize().to_vec()).unwrap_or_else(|_| AccAddress::module(label))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NativeHandler;

impl NativeHandler {
    fn multi_send<S: TaxState + ?Sized>(
        &self,
        state: &mut S,
        inputs: &[Input],
        outputs: &[Output],
    ) -> Result<MsgResponse, TaxError> {
        let sum_in = sum_coins(inputs.iter().map(|i| &i.coins))?;
        let sum_out = sum_coins(outputs.iter().map(|o| &o.coins))?;
        if sum_in != sum_out {
            return Err(TaxError::InconsistentMultiSend {
                inputs: sum_in.to_string(),
                outputs: sum_out.to_string(),
            });
        }

        let senders: Vec<(AccAddress, Coins)> = inputs
            .iter()
            .map(|i| Ok((decode_address("inputs.address", &i.address)?, i.coins.clone())))
            .collect::<Result<_, TaxError>>()?;
        let recipients: Vec<(AccAddress, Coins)> = outputs
            .iter()
            .map(|o| Ok((decode_address("outputs.address", &o.address)?, o.coins.clone())))
            .collect::<Result<_, TaxError>>()?;

        let mut events = Vec::new();
        for denom in sum_in.denoms() {
            let mut left: Vec<Amount> = senders.iter().map(|(_, c)| c.amount_of(denom)).collect();
            let mut i = 0;
            for (to, coins) in &recipients {
                let mut owed = coins.amount_of(denom);
                while !owed.is_zero() && i < senders.len() {
                    let take = owed.min(left[i]);
                    if !take.is_zero() {
                        let moved = Coins::from_coin(Coin {
                            denom: denom.to_string(),
                            amount: take,
                        })?;
                        state.send_coins(&senders[i].0, to, &moved)?;
                        events.push(transfer_event(&senders[i].0, to, &moved));
                        owed = owed.saturating_sub(take);
                        left[i] = left[i].saturating_sub(take);
                    }
                    if left[i].is_zero() {
                        i += 1;
                    }
                }
            }
        }
        Ok(MsgResponse { events })
    }
}

impl<S: TaxState + ?Sized> MsgHandler<S> for NativeHandler {
    fn handle(&self, state: &mut S, msg: &Msg) -> Result<MsgResponse, TaxError> {
        match msg {
            Msg::BankSend {
                from_address,
                to_address,
                amount,
            } => {
                let from = decode_address("from_address", from_address)?;
                let to = decode_address("to_address", to_address)?;
                state.send_coins(&from, &to, amount)?;
                Ok(MsgResponse {
                    events: vec![transfer_event(&from, &to, amount)],
                })
            }
            Msg::BankMultiSend { inputs, outputs } => self.multi_send(state, inputs, outputs),
            Msg::MarketSwapSend {
                from_address,
                to_address,
                offer_coin,
                ask_denom,
            } => {
                let from = decode_address("from_address", from_address)?;
                let to = decode_address("to_address", to_address)?;
                let offer = Coins::from_coin(offer_coin.clone())?;
                state.send_coins_from_account_to_module(&from, module::MARKET, &offer)?;
                Ok(MsgResponse {
                    events: vec![Event::new(EVENT_SWAP)
                        .add_attribute("trader", from)
                        .add_attribute("recipient", to)
                        .add_attribute("offer", offer_coin)
                        .add_attribute("ask_denom", ask_denom)],
                })
            }
            Msg::WasmExecuteContract {
                sender,
                contract,
                funds,
                ..
            } => {
                let sender = decode_address("sender", sender)?;
                let contract = decode_address("contract", contract)?;
                state.send_coins(&sender, &contract, funds)?;
                Ok(MsgResponse {
                    events: vec![Event::new(EVENT_EXECUTE)
                        .add_attribute("contract_address", contract)
                        .add_attribute("funds", funds)],
                })
            }
            Msg::WasmInstantiateContract {
                sender,
                code_id,
                label,
                funds,
                ..
            } => {
                let sender = decode_address("sender", sender)?;
                let contract = contract_address(&sender, *code_id, label, None);
                state.send_coins(&sender, &contract, funds)?;
                Ok(instantiated(&contract, *code_id, funds))
            }
            Msg::WasmInstantiateContract2 {
                sender,
                code_id,
                label,
                funds,
                salt,
                ..
            } => {
                let sender = decode_address("sender", sender)?;
                let salt = hex::decode(salt)
                    .map_err(|e| TaxError::InvalidParams(format!("salt: {e}")))?;
                let contract = contract_address(&sender, *code_id, label, Some(&salt));
                state.send_coins(&sender, &contract, funds)?;
                Ok(instantiated(&contract, *code_id, funds))
            }
            Msg::Other { .. } => Ok(MsgResponse::default()),
        }
    }
}

fn instantiated(contract: &AccAddress, code_id: u64, funds: &Coins) -> MsgResponse {
    MsgResponse {
        events: vec![Event::new(EVENT_INSTANTIATE)
            .add_attribute("contract_address", contract)
            .add_attribute("code_id", code_id)
            .add_attribute("funds", funds)],
    }
}
