//! Bank collaborator trait.

use crate::StoreError;
use lunc_types::{module, AccAddress, Coins};

/// Coin custody operations the tax pipeline orders.
///
/// The bank decides how balances are stored and how coins are destroyed;
/// callers only choose which moves happen and in what order. Every operation
/// either applies completely or fails without touching state.
pub trait BankKeeper {
    /// All balances held by `address`; empty when the account holds nothing.
    fn get_all_balances(&self, address: &AccAddress) -> Coins;

    /// Account-to-account transfer.
    fn send_coins(&mut self, from: &AccAddress, to: &AccAddress, coins: &Coins)
        -> Result<(), StoreError>;

    fn send_coins_from_account_to_module(
        &mut self,
        from: &AccAddress,
        module: &str,
        coins: &Coins,
    ) -> Result<(), StoreError>;

    fn send_coins_from_module_to_module(
        &mut self,
        from_module: &str,
        to_module: &str,
        coins: &Coins,
    ) -> Result<(), StoreError>;

    /// Destroy `coins` held by the module account, reducing total supply.
    fn burn_coins(&mut self, module: &str, coins: &Coins) -> Result<(), StoreError>;

    /// Total supply of every denomination.
    fn total_supply(&self) -> Coins;

    /// Move fees from `payer` straight into the fee collector.
    fn deduct_fees(&mut self, payer: &AccAddress, fees: &Coins) -> Result<(), StoreError> {
        self.send_coins_from_account_to_module(payer, module::FEE_COLLECTOR, fees)
    }

    /// Balances of a module account.
    fn module_balances(&self, module: &str) -> Coins {
        self.get_all_balances(&module::module_address(module))
    }
}
