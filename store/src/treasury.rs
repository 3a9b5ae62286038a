//! Treasury collaborator trait.

use crate::StoreError;
use lunc_types::{AccAddress, Coins, Decimal};

/// Treasury-owned state read (and in two places written) by the tax pipeline.
pub trait TreasuryKeeper {
    /// Canonical burn tax rate.
    fn get_tax_rate(&self) -> Decimal;

    /// Written only when governance updates the tax params.
    fn set_tax_rate(&mut self, rate: Decimal);

    /// Fraction of collected tax diverted away from the burn sink.
    fn get_burn_split_rate(&self) -> Decimal;

    /// Fraction of the diverted amount that goes to oracle rewards.
    fn get_oracle_split_rate(&self) -> Decimal;

    /// True if any of `addresses` is in the burn-tax exemption list.
    fn has_burn_tax_exemption_address(&self, addresses: &[&AccAddress]) -> bool;

    /// True if `contract` is exempt from burn tax on fund transfers.
    fn has_burn_tax_exemption_contract(&self, contract: &AccAddress) -> bool;

    /// Add `coins` to the current epoch's tax proceeds.
    fn record_epoch_tax_proceeds(&mut self, coins: &Coins) -> Result<(), StoreError>;

    /// Tax proceeds recorded so far in the current epoch.
    fn epoch_tax_proceeds(&self) -> Coins;
}
