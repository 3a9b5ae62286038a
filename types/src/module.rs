//! Well-known module account names.

use crate::address::AccAddress;

/// Holds collected fees and taxes until they are split or distributed.
pub const FEE_COLLECTOR: &str = "fee_collector";
/// Distribution module; also custodian of the community pool.
pub const DISTRIBUTION: &str = "distribution";
/// Oracle reward pool.
pub const ORACLE: &str = "oracle";
/// Burn sink, emptied by the end-of-block sweep.
pub const BURN: &str = "burn";
/// Market module; receives swap offers.
pub const MARKET: &str = "market";

/// Every module account the tax pipeline touches.
pub const ALL: [&str; 5] = [FEE_COLLECTOR, DISTRIBUTION, ORACLE, BURN, MARKET];

/// Address of the module account called `name`.
pub fn module_address(name: &str) -> AccAddress {
    AccAddress::module(name)
}
