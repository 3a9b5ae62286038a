//! The taxable-message capability.
//!
//! A message is taxable when it moves value out of a single payer. For those
//! kinds [`Taxable`] names the payer, the coins taxed and the exemption rule,
//! and [`Msg::with_net_amount`] rebuilds the message with the taxed coins
//! replaced by what is left after tax. Multi-send has several payers and is
//! handled by [`crate::multisend`].

use crate::msgs::{decode_address, Msg};
use lunc_store::TaxState;
use lunc_tax::{compute_tax, has_contract_exemption, has_pair_exemption, TaxError};
use lunc_types::{AccAddress, Coin, Coins};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaxableKind {
    BankSend,
    BankMultiSend,
    SwapSend,
    WasmExec,
    WasmInstantiate,
    WasmInstantiate2,
}

/// How a single-payer message escapes tax.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Exemption {
    /// Exempt when either end of the transfer is listed.
    Pair(AccAddress, AccAddress),
    /// Exempt when the receiving contract is listed.
    Contract(AccAddress),
    /// Always taxed.
    None,
}

impl Exemption {
    pub fn applies<S: TaxState + ?Sized>(&self, state: &S) -> bool {
        match self {
            Exemption::Pair(a, b) => has_pair_exemption(state, &[a, b]),
            Exemption::Contract(c) => has_contract_exemption(state, c),
            Exemption::None => false,
        }
    }
}

/// Decoded tax terms of a single-payer message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Taxable {
    pub kind: TaxableKind,
    pub payer: AccAddress,
    pub coins: Coins,
    pub exemption: Exemption,
}

impl Msg {
    pub fn taxable_kind(&self) -> Option<TaxableKind> {
        match self {
            Msg::BankSend { .. } => Some(TaxableKind::BankSend),
            Msg::BankMultiSend { .. } => Some(TaxableKind::BankMultiSend),
            Msg::MarketSwapSend { .. } => Some(TaxableKind::SwapSend),
            Msg::WasmExecuteContract { .. } => Some(TaxableKind::WasmExec),
            Msg::WasmInstantiateContract { .. } => Some(TaxableKind::WasmInstantiate),
            Msg::WasmInstantiateContract2 { .. } => Some(TaxableKind::WasmInstantiate2),
            Msg::Other { .. } => None,
        }
    }

    /// Tax terms of a single-payer message; `None` for multi-send and for
    /// kinds that are not taxed.
    pub fn taxable(&self) -> Result<Option<Taxable>, TaxError> {
        let taxable = match self {
            Msg::BankSend {
                from_address,
                to_address,
                amount,
            } => {
                let payer = decode_address("from_address", from_address)?;
                let to = decode_address("to_address", to_address)?;
                Taxable {
                    kind: TaxableKind::BankSend,
                    exemption: Exemption::Pair(payer.clone(), to),
                    payer,
                    coins: amount.clone(),
                }
            }
            Msg::MarketSwapSend {
                from_address,
                to_address,
                offer_coin,
                ..
            } => {
                let payer = decode_address("from_address", from_address)?;
                let to = decode_address("to_address", to_address)?;
                Taxable {
                    kind: TaxableKind::SwapSend,
                    exemption: Exemption::Pair(payer.clone(), to),
                    payer,
                    coins: Coins::from_coin(offer_coin.clone())?,
                }
            }
            Msg::WasmExecuteContract {
                sender,
                contract,
                funds,
                ..
            } => Taxable {
                kind: TaxableKind::WasmExec,
                payer: decode_address("sender", sender)?,
                exemption: Exemption::Contract(decode_address("contract", contract)?),
                coins: funds.clone(),
            },
            Msg::WasmInstantiateContract { sender, funds, .. } => Taxable {
                kind: TaxableKind::WasmInstantiate,
                payer: decode_address("sender", sender)?,
                exemption: Exemption::None,
                coins: funds.clone(),
            },
            Msg::WasmInstantiateContract2 { sender, funds, .. } => Taxable {
                kind: TaxableKind::WasmInstantiate2,
                payer: decode_address("sender", sender)?,
                exemption: Exemption::None,
                coins: funds.clone(),
            },
            Msg::BankMultiSend { .. } | Msg::Other { .. } => return Ok(None),
        };
        Ok(Some(taxable))
    }

    /// The same message moving `net` instead of its taxed coins.
    pub fn with_net_amount(self, net: Coins) -> Msg {
        match self {
            Msg::BankSend {
                from_address,
                to_address,
                ..
            } => Msg::BankSend {
                from_address,
                to_address,
                amount: net,
            },
            Msg::MarketSwapSend {
                from_address,
                to_address,
                offer_coin,
                ask_denom,
            } => {
                let amount = net.amount_of(&offer_coin.denom);
                Msg::MarketSwapSend {
                    from_address,
                    to_address,
                    offer_coin: Coin {
                        denom: offer_coin.denom,
                        amount,
                    },
                    ask_denom,
                }
            }
            Msg::WasmExecuteContract {
                sender,
                contract,
                msg,
                ..
            } => Msg::WasmExecuteContract {
                sender,
                contract,
                msg,
                funds: net,
            },
            Msg::WasmInstantiateContract {
                sender,
                admin,
                code_id,
                label,
                msg,
                ..
            } => Msg::WasmInstantiateContract {
                sender,
                admin,
                code_id,
                label,
                msg,
                funds: net,
            },
            Msg::WasmInstantiateContract2 {
                sender,
                admin,
                code_id,
                label,
                msg,
                salt,
                fix_msg,
                ..
            } => Msg::WasmInstantiateContract2 {
                sender,
                admin,
                code_id,
                label,
                msg,
                funds: net,
                salt,
                fix_msg,
            },
            other @ (Msg::BankMultiSend { .. } | Msg::Other { .. }) => other,
        }
    }
}

/// Burn tax the message layer would charge for `msgs`, honouring exemptions.
/// Used by the fee check before execution.
pub fn estimate_taxes<S: TaxState + ?Sized>(state: &S, msgs: &[Msg]) -> Result<Coins, TaxError> {
    let rate = state.get_tax_rate();
    let mut total = Coins::empty();
    for msg in msgs {
        if let Msg::BankMultiSend { inputs, outputs } = msg {
            for input in crate::multisend::taxed_inputs(state, inputs, outputs)? {
                total = total.checked_add(&compute_tax(rate, &input.coins)?)?;
            }
            continue;
        }
        if let Some(taxable) = msg.taxable()? {
            if !taxable.exemption.applies(state) {
                total = total.checked_add(&compute_tax(rate, &taxable.coins)?)?;
            }
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunc_nullables::NullChain;
    use lunc_types::Decimal;

    fn addr(n: u8) -> AccAddress {
        AccAddress::new(vec![n; 20]).unwrap()
    }

    fn contract(n: u8) -> AccAddress {
        AccAddress::new(vec![n; 32]).unwrap()
    }

    fn coins(s: &str) -> Coins {
        s.parse().unwrap()
    }

    fn send(from: u8, to: u8, amount: &str) -> Msg {
        Msg::BankSend {
            from_address: addr(from).to_string(),
            to_address: addr(to).to_string(),
            amount: coins(amount),
        }
    }

    #[test]
    fn unknown_kinds_are_not_taxable() {
        let msg = Msg::Other {
            type_url: "/cosmos.staking.v1beta1.MsgDelegate".into(),
        };
        assert_eq!(msg.taxable_kind(), None);
        assert_eq!(msg.taxable().unwrap(), None);
        assert_eq!(msg.clone().with_net_amount(coins("1uluna")), msg);
    }

    #[test]
    fn bank_send_terms() {
        let taxable = send(1, 2, "100uluna").taxable().unwrap().unwrap();
        assert_eq!(taxable.kind, TaxableKind::BankSend);
        assert_eq!(taxable.payer, addr(1));
        assert_eq!(taxable.exemption, Exemption::Pair(addr(1), addr(2)));
    }

    #[test]
    fn swap_send_rewrites_offer_coin() {
        let msg = Msg::MarketSwapSend {
            from_address: addr(1).to_string(),
            to_address: addr(2).to_string(),
            offer_coin: Coin::new(10_000u128, "usdr"),
            ask_denom: "uluna".into(),
        };
        let taxable = msg.taxable().unwrap().unwrap();
        assert_eq!(taxable.coins, coins("10000usdr"));
        match msg.with_net_amount(coins("9900usdr")) {
            Msg::MarketSwapSend { offer_coin, .. } => {
                assert_eq!(offer_coin, Coin::new(9_900u128, "usdr"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn wasm_exemption_rules() {
        let exec = Msg::WasmExecuteContract {
            sender: addr(1).to_string(),
            contract: contract(9).to_string(),
            msg: "{}".into(),
            funds: coins("100uluna"),
        };
        assert_eq!(
            exec.taxable().unwrap().unwrap().exemption,
            Exemption::Contract(contract(9))
        );
        let inst = Msg::WasmInstantiateContract {
            sender: addr(1).to_string(),
            admin: None,
            code_id: 1,
            label: "l".into(),
            msg: "{}".into(),
            funds: coins("100uluna"),
        };
        assert_eq!(inst.taxable().unwrap().unwrap().exemption, Exemption::None);
    }

    #[test]
    fn invalid_address_fails_decoding() {
        let msg = Msg::BankSend {
            from_address: "cosmos1xyz".into(),
            to_address: addr(2).to_string(),
            amount: coins("1uluna"),
        };
        assert!(matches!(msg.taxable(), Err(TaxError::InvalidAddress(_))));
    }

    #[test]
    fn estimate_skips_exempt_messages() {
        let chain = NullChain::new()
            .with_tax_rate(Decimal::permille(5))
            .with_exempt_pair(&addr(3), &addr(4));
        let msgs = vec![
            send(1, 2, "1000000uluna"),
            send(3, 2, "1000000uluna"),
            send(1, 2, "20000usdr"),
        ];
        assert_eq!(estimate_taxes(&chain, &msgs).unwrap(), coins("5000uluna,100usdr"));
    }
}
