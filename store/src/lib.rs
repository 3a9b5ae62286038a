//! Abstract collaborator traits for the tax pipeline.
//!
//! The tax core never stores coins itself. It orders operations on the bank,
//! treasury and distribution modules through these traits; concrete backends
//! (the in-memory nullables for tests, a real chain store in production)
//! implement them.

pub mod account;
pub mod bank;
pub mod distribution;
pub mod error;
pub mod kv;
pub mod treasury;

pub use account::AccountKeeper;
pub use bank::BankKeeper;
pub use distribution::{DistributionKeeper, FeePool};
pub use error::StoreError;
pub use kv::KvStore;
pub use treasury::TreasuryKeeper;

/// Everything the tax pipeline needs from the surrounding chain state.
pub trait TaxState: AccountKeeper + BankKeeper + DistributionKeeper + KvStore + TreasuryKeeper {}

impl<T> TaxState for T where T: AccountKeeper + BankKeeper + DistributionKeeper + KvStore + TreasuryKeeper {}
