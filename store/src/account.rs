//! Account storage trait.

use lunc_types::AccAddress;

/// Read access to the account registry.
///
/// An account exists once it has been created at genesis or has received
/// coins; module accounts always exist.
pub trait AccountKeeper {
    fn has_account(&self, address: &AccAddress) -> bool;
}
