//! Genesis state for the tax pipeline and the hooks that load it.

use crate::error::AppError;
use lunc_nullables::NullChain;
use lunc_store::{StoreError, TaxState};
use lunc_tax::set_params;
use lunc_types::{AccAddress, Coins, Decimal, TaxParams};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisBalance {
    pub address: String,
    pub coins: Coins,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub burn_split_rate: Decimal,
    #[serde(default)]
    pub oracle_split_rate: Decimal,
    #[serde(default)]
    pub community_tax: Decimal,
    /// Addresses exempt from burn tax on their own.
    #[serde(default)]
    pub exempt_addresses: Vec<String>,
    /// Pairs exempt from burn tax; each end is listed.
    #[serde(default)]
    pub exempt_pairs: Vec<[String; 2]>,
    #[serde(default)]
    pub exempt_contracts: Vec<String>,
    #[serde(default)]
    pub balances: Vec<GenesisBalance>,
    #[serde(default)]
    pub params: TaxParams,
}

impl Default for GenesisState {
    fn default() -> Self {
        Self {
            burn_split_rate: Decimal::ZERO,
            oracle_split_rate: Decimal::ZERO,
            community_tax: Decimal::ZERO,
            exempt_addresses: Vec::new(),
            exempt_pairs: Vec::new(),
            exempt_contracts: Vec::new(),
            params: TaxParams::classic_defaults(),
            balances: Vec::new(),
        }
    }
}

fn check_ratio(name: &str, value: Decimal) -> Result<(), AppError> {
    if value.is_negative() || value > Decimal::ONE {
        return Err(AppError::Genesis(format!("{name} must be within [0, 1], got {value}")));
    }
    Ok(())
}

fn parse_address(field: &str, value: &str) -> Result<AccAddress, AppError> {
    value
        .parse()
        .map_err(|e| AppError::Genesis(format!("{field}: {e}")))
}

impl GenesisState {
    pub fn validate(&self) -> Result<(), AppError> {
        self.params
            .validate()
            .map_err(|e| AppError::Genesis(format!("params: {e}")))?;
        check_ratio("burn_split_rate", self.burn_split_rate)?;
        check_ratio("oracle_split_rate", self.oracle_split_rate)?;
        check_ratio("community_tax", self.community_tax)?;
        for address in &self.exempt_addresses {
            parse_address("exempt_addresses", address)?;
        }
        for [a, b] in &self.exempt_pairs {
            parse_address("exempt_pairs", a)?;
            parse_address("exempt_pairs", b)?;
        }
        for contract in &self.exempt_contracts {
            parse_address("exempt_contracts", contract)?;
        }
        let mut seen = std::collections::BTreeSet::new();
        for balance in &self.balances {
            let address = parse_address("balances", &balance.address)?;
            if !seen.insert(address) {
                return Err(AppError::Genesis(format!(
                    "duplicate balance for {}",
                    balance.address
                )));
            }
        }
        Ok(())
    }
}

/// Writes only genesis may perform: minting and treasury/distribution setup.
pub trait GenesisStore {
    fn mint(&mut self, address: &AccAddress, coins: &Coins) -> Result<(), StoreError>;
    fn set_split_rates(&mut self, burn_split: Decimal, oracle_split: Decimal);
    fn set_community_tax(&mut self, rate: Decimal);
    fn add_exempt_address(&mut self, address: AccAddress);
    fn add_exempt_contract(&mut self, contract: AccAddress);
}

impl GenesisStore for NullChain {
    fn mint(&mut self, address: &AccAddress, coins: &Coins) -> Result<(), StoreError> {
        self.bank.mint(address, coins)
    }

    fn set_split_rates(&mut self, burn_split: Decimal, oracle_split: Decimal) {
        self.treasury.burn_split_rate = burn_split;
        self.treasury.oracle_split_rate = oracle_split;
    }

    fn set_community_tax(&mut self, rate: Decimal) {
        self.distribution.community_tax = rate;
    }

    fn add_exempt_address(&mut self, address: AccAddress) {
        self.treasury.address_exemptions.insert(address);
    }

    fn add_exempt_contract(&mut self, contract: AccAddress) {
        self.treasury.contract_exemptions.insert(contract);
    }
}

/// Validate `genesis` and load it into `state`.
pub fn init_genesis<S>(state: &mut S, genesis: &GenesisState) -> Result<(), AppError>
where
    S: TaxState + GenesisStore + ?Sized,
{
    genesis.validate()?;

    set_params(state, &genesis.params)?;
    state.set_split_rates(genesis.burn_split_rate, genesis.oracle_split_rate);
    state.set_community_tax(genesis.community_tax);

    for address in &genesis.exempt_addresses {
        state.add_exempt_address(parse_address("exempt_addresses", address)?);
    }
    for [a, b] in &genesis.exempt_pairs {
        state.add_exempt_address(parse_address("exempt_pairs", a)?);
        state.add_exempt_address(parse_address("exempt_pairs", b)?);
    }
    for contract in &genesis.exempt_contracts {
        state.add_exempt_contract(parse_address("exempt_contracts", contract)?);
    }
    for balance in &genesis.balances {
        state.mint(&parse_address("balances", &balance.address)?, &balance.coins)?;
    }

    info!(
        burn_tax_rate = %genesis.params.burn_tax_rate,
        accounts = genesis.balances.len(),
        exemptions = genesis.exempt_addresses.len() + 2 * genesis.exempt_pairs.len(),
        "genesis loaded"
    );
    Ok(())
}
