//! Nullable bank: in-memory balances and supply.

use lunc_store::StoreError;
use lunc_types::{module, AccAddress, Coins};
use std::collections::{BTreeMap, BTreeSet};

/// Modules allowed to destroy coins they hold.
const BURNER_MODULES: [&str; 2] = [module::BURN, module::MARKET];

/// In-memory balances keyed by address bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NullBank {
    balances: BTreeMap<AccAddress, Coins>,
    accounts: BTreeSet<AccAddress>,
    supply: Coins,
}

impl NullBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `coins` into `address`, creating the account. Genesis and tests only.
    pub fn mint(&mut self, address: &AccAddress, coins: &Coins) -> Result<(), StoreError> {
        self.supply = self.supply.checked_add(coins)?;
        self.credit(address, coins)
    }

    pub fn create_account(&mut self, address: AccAddress) {
        self.accounts.insert(address);
    }

    pub fn has_account(&self, address: &AccAddress) -> bool {
        self.accounts.contains(address)
            || module::ALL
                .iter()
                .any(|name| module::module_address(name) == *address)
    }

    pub fn balances(&self, address: &AccAddress) -> Coins {
        self.balances.get(address).cloned().unwrap_or_default()
    }

    pub fn supply(&self) -> Coins {
        self.supply.clone()
    }

    pub fn transfer(
        &mut self,
        from: &AccAddress,
        to: &AccAddress,
        coins: &Coins,
    ) -> Result<(), StoreError> {
        if coins.is_empty() {
            return Ok(());
        }
        self.debit(from, coins)?;
        self.credit(to, coins)
    }

    pub fn burn(&mut self, module_name: &str, coins: &Coins) -> Result<(), StoreError> {
        if !BURNER_MODULES.contains(&module_name) {
            return Err(StoreError::UnknownModule(format!(
                "{module_name} has no burn permission"
            )));
        }
        if coins.is_empty() {
            return Ok(());
        }
        self.debit(&module::module_address(module_name), coins)?;
        self.supply = self.supply.checked_sub(coins)?;
        Ok(())
    }

    fn debit(&mut self, address: &AccAddress, coins: &Coins) -> Result<(), StoreError> {
        let held = self.balances(address);
        if !held.is_all_gte(coins) {
            return Err(StoreError::InsufficientFunds {
                address: address.to_string(),
                available: held.to_string(),
                required: coins.to_string(),
            });
        }
        let rest = held.checked_sub(coins)?;
        if rest.is_empty() {
            self.balances.remove(address);
        } else {
            self.balances.insert(address.clone(), rest);
        }
        Ok(())
    }

    fn credit(&mut self, address: &AccAddress, coins: &Coins) -> Result<(), StoreError> {
        let total = self.balances(address).checked_add(coins)?;
        self.accounts.insert(address.clone());
        if !total.is_empty() {
            self.balances.insert(address.clone(), total);
        }
        Ok(())
    }
}

/// Reject module names the chain does not know.
pub fn check_module(name: &str) -> Result<AccAddress, StoreError> {
    if module::ALL.contains(&name) {
        Ok(module::module_address(name))
    } else {
        Err(StoreError::UnknownModule(name.to_string()))
    }
}
