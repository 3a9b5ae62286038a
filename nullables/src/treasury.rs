//! Nullable treasury: ratios, exemption lists and epoch proceeds.

use lunc_store::StoreError;
use lunc_types::{AccAddress, Coins, Decimal, ExemptionSet};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NullTreasury {
    pub tax_rate: Decimal,
    pub burn_split_rate: Decimal,
    pub oracle_split_rate: Decimal,
    pub address_exemptions: ExemptionSet,
    pub contract_exemptions: ExemptionSet,
    pub epoch_tax_proceeds: Coins,
}

impl NullTreasury {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, coins: &Coins) -> Result<(), StoreError> {
        self.epoch_tax_proceeds = self.epoch_tax_proceeds.checked_add(coins)?;
        Ok(())
    }

    pub fn is_address_exempt(&self, addresses: &[&AccAddress]) -> bool {
        self.address_exemptions.contains_any(addresses)
    }

    pub fn is_contract_exempt(&self, contract: &AccAddress) -> bool {
        self.contract_exemptions.contains(contract)
    }
}
