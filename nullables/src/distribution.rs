//! Nullable distribution: community tax and fee pool.

use lunc_store::FeePool;
use lunc_types::Decimal;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NullDistribution {
    pub community_tax: Decimal,
    pub fee_pool: FeePool,
}

impl NullDistribution {
    pub fn new() -> Self {
        Self::default()
    }
}
