//! Nullable chain: one in-memory value implementing every collaborator.
//!
//! Cloning a `NullChain` is the branch operation: the application runs a
//! transaction against a clone and swaps it in only on success, which gives
//! all-or-nothing semantics without locks.

use crate::bank::{check_module, NullBank};
use crate::distribution::NullDistribution;
use crate::treasury::NullTreasury;
use lunc_store::{
    AccountKeeper, BankKeeper, DistributionKeeper, FeePool, KvStore, StoreError, TreasuryKeeper,
};
use lunc_types::{AccAddress, Coins, Decimal};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NullChain {
    pub bank: NullBank,
    pub treasury: NullTreasury,
    pub distribution: NullDistribution,
    kv: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl NullChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `coins` into `address`.
    ///
    /// # Panics
    /// Panics if the literal is malformed or supply would overflow.
    pub fn with_balance(mut self, address: &AccAddress, coins: &str) -> Self {
        let coins: Coins = coins.parse().expect("valid coins literal");
        self.bank.mint(address, &coins).expect("mint succeeds");
        self
    }

    pub fn with_tax_rate(mut self, rate: Decimal) -> Self {
        self.treasury.tax_rate = rate;
        self
    }

    pub fn with_split_rates(mut self, burn_split: Decimal, oracle_split: Decimal) -> Self {
        self.treasury.burn_split_rate = burn_split;
        self.treasury.oracle_split_rate = oracle_split;
        self
    }

    pub fn with_community_tax(mut self, rate: Decimal) -> Self {
        self.distribution.community_tax = rate;
        self
    }

    pub fn with_exempt_pair(mut self, a: &AccAddress, b: &AccAddress) -> Self {
        self.treasury
            .address_exemptions
            .insert_pair(a.clone(), b.clone());
        self
    }

    pub fn with_exempt_contract(mut self, contract: &AccAddress) -> Self {
        self.treasury.contract_exemptions.insert(contract.clone());
        self
    }

    /// Balance of a single denomination, handy in assertions.
    pub fn balance_of(&self, address: &AccAddress, denom: &str) -> u128 {
        self.bank.balances(address).amount_of(denom).raw().as_u128()
    }
}

impl AccountKeeper for NullChain {
    fn has_account(&self, address: &AccAddress) -> bool {
        self.bank.has_account(address)
    }
}

impl BankKeeper for NullChain {
    fn get_all_balances(&self, address: &AccAddress) -> Coins {
        self.bank.balances(address)
    }

    fn send_coins(
        &mut self,
        from: &AccAddress,
        to: &AccAddress,
        coins: &Coins,
    ) -> Result<(), StoreError> {
        self.bank.transfer(from, to, coins)
    }

    fn send_coins_from_account_to_module(
        &mut self,
        from: &AccAddress,
        module: &str,
        coins: &Coins,
    ) -> Result<(), StoreError> {
        let to = check_module(module)?;
        self.bank.transfer(from, &to, coins)
    }

    fn send_coins_from_module_to_module(
        &mut self,
        from_module: &str,
        to_module: &str,
        coins: &Coins,
    ) -> Result<(), StoreError> {
        let from = check_module(from_module)?;
        let to = check_module(to_module)?;
        self.bank.transfer(&from, &to, coins)
    }

    fn burn_coins(&mut self, module: &str, coins: &Coins) -> Result<(), StoreError> {
        check_module(module)?;
        self.bank.burn(module, coins)
    }

    fn total_supply(&self) -> Coins {
        self.bank.supply()
    }
}

impl TreasuryKeeper for NullChain {
    fn get_tax_rate(&self) -> Decimal {
        self.treasury.tax_rate
    }

    fn set_tax_rate(&mut self, rate: Decimal) {
        self.treasury.tax_rate = rate;
    }

    fn get_burn_split_rate(&self) -> Decimal {
        self.treasury.burn_split_rate
    }

    fn get_oracle_split_rate(&self) -> Decimal {
        self.treasury.oracle_split_rate
    }

    fn has_burn_tax_exemption_address(&self, addresses: &[&AccAddress]) -> bool {
        self.treasury.is_address_exempt(addresses)
    }

    fn has_burn_tax_exemption_contract(&self, contract: &AccAddress) -> bool {
        self.treasury.is_contract_exempt(contract)
    }

    fn record_epoch_tax_proceeds(&mut self, coins: &Coins) -> Result<(), StoreError> {
        self.treasury.record(coins)
    }

    fn epoch_tax_proceeds(&self) -> Coins {
        self.treasury.epoch_tax_proceeds.clone()
    }
}

impl DistributionKeeper for NullChain {
    fn get_community_tax(&self) -> Decimal {
        self.distribution.community_tax
    }

    fn get_fee_pool(&self) -> FeePool {
        self.distribution.fee_pool.clone()
    }

    fn set_fee_pool(&mut self, fee_pool: FeePool) {
        self.distribution.fee_pool = fee_pool;
    }
}

impl KvStore for NullChain {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.kv.get(key).cloned()
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.kv.insert(key.to_vec(), value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.kv.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunc_types::module;

    fn addr(n: u8) -> AccAddress {
        AccAddress::new(vec![n; 20]).unwrap()
    }

    #[test]
    fn module_to_module_transfer() {
        let fee_collector = module::module_address(module::FEE_COLLECTOR);
        let mut chain = NullChain::new().with_balance(&fee_collector, "100uluna");
        chain
            .send_coins_from_module_to_module(
                module::FEE_COLLECTOR,
                module::ORACLE,
                &"30uluna".parse().unwrap(),
            )
            .unwrap();
        assert_eq!(chain.module_balances(module::ORACLE).to_string(), "30uluna");
        assert_eq!(chain.balance_of(&fee_collector, "uluna"), 70);
    }

    #[test]
    fn unknown_module_is_rejected() {
        let mut chain = NullChain::new().with_balance(&addr(1), "10uluna");
        let err = chain
            .send_coins_from_account_to_module(&addr(1), "staking", &"1uluna".parse().unwrap())
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownModule(_)));
    }

    #[test]
    fn branch_is_independent_of_parent() {
        let parent = NullChain::new().with_balance(&addr(1), "10uluna");
        let mut branch = parent.clone();
        branch
            .send_coins(&addr(1), &addr(2), &"10uluna".parse().unwrap())
            .unwrap();
        assert_eq!(parent.balance_of(&addr(1), "uluna"), 10);
        assert_eq!(branch.balance_of(&addr(2), "uluna"), 10);
        assert_ne!(parent, branch);
    }

    #[test]
    fn kv_round_trip() {
        let mut chain = NullChain::new();
        chain.set(&[0x01], vec![1, 2, 3]);
        assert!(chain.has(&[0x01]));
        assert_eq!(chain.get(&[0x01]), Some(vec![1, 2, 3]));
        chain.delete(&[0x01]);
        assert!(!chain.has(&[0x01]));
    }
}
