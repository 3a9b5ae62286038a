//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator of the tax pipeline (bank, treasury, distribution, kv
//! store) is abstracted behind a trait in `lunc-store`. This crate provides
//! in-memory implementations that:
//! - Return deterministic values
//! - Can be configured programmatically
//! - Branch by cloning, so a failed transaction can simply be dropped
//!
//! Usage: build a [`NullChain`] with the balances and ratios a test needs and
//! hand it to the tax keeper, router or application.

pub mod bank;
pub mod chain;
pub mod distribution;
pub mod treasury;

pub use bank::NullBank;
pub use chain::NullChain;
pub use distribution::NullDistribution;
pub use treasury::NullTreasury;
