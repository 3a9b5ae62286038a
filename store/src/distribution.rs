//! Distribution collaborator trait.

use lunc_types::{DecCoins, Decimal};
use serde::{Deserialize, Serialize};

/// Global fee pool kept by the distribution module.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePool {
    /// Decimal accumulator mirroring the coins held for the community pool.
    pub community_pool: DecCoins,
}

pub trait DistributionKeeper {
    /// Fraction of distributed rewards that goes to the community pool.
    fn get_community_tax(&self) -> Decimal;

    fn get_fee_pool(&self) -> FeePool;

    fn set_fee_pool(&mut self, fee_pool: FeePool);
}
