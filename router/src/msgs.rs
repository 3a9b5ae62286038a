//! State-transition messages the router sees.
//!
//! Address fields stay bech32 strings, as they arrive on the wire; they are
//! decoded when a handler needs them, and a bad one fails the message.

use lunc_tax::TaxError;
use lunc_types::{AccAddress, Coin, Coins};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub address: String,
    pub coins: Coins,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub address: String,
    pub coins: Coins,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Msg {
    BankSend {
        from_address: String,
        to_address: String,
        amount: Coins,
    },
    BankMultiSend {
        inputs: Vec<Input>,
        outputs: Vec<Output>,
    },
    MarketSwapSend {
        from_address: String,
        to_address: String,
        offer_coin: Coin,
        ask_denom: String,
    },
    WasmExecuteContract {
        sender: String,
        contract: String,
        /// Raw JSON payload for the contract.
        msg: String,
        funds: Coins,
    },
    WasmInstantiateContract {
        sender: String,
        admin: Option<String>,
        code_id: u64,
        label: String,
        msg: String,
        funds: Coins,
    },
    WasmInstantiateContract2 {
        sender: String,
        admin: Option<String>,
        code_id: u64,
        label: String,
        msg: String,
        funds: Coins,
        /// Hex-encoded salt for the predictable contract address.
        salt: String,
        fix_msg: bool,
    },
    /// Any message the tax pipeline does not inspect.
    Other { type_url: String },
}

impl Msg {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Msg::BankSend { .. } => "bank_send",
            Msg::BankMultiSend { .. } => "bank_multi_send",
            Msg::MarketSwapSend { .. } => "market_swap_send",
            Msg::WasmExecuteContract { .. } => "wasm_execute_contract",
            Msg::WasmInstantiateContract { .. } => "wasm_instantiate_contract",
            Msg::WasmInstantiateContract2 { .. } => "wasm_instantiate_contract2",
            Msg::Other { .. } => "other",
        }
    }
}

/// Decode a bech32 account or contract address carried by a message.
pub fn decode_address(field: &str, value: &str) -> Result<AccAddress, TaxError> {
    value
        .parse()
        .map_err(|err| TaxError::InvalidAddress(format!("{field}: {err}")))
}
