//! Fundamental types for the Terra Classic tax pipeline.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: 256-bit amounts, coin bundles, 18-digit fixed-point decimals,
//! bech32 addresses, module account names, tax parameters, exemption sets and
//! events.

pub mod address;
pub mod amount;
pub mod coin;
pub mod decimal;
pub mod error;
pub mod event;
pub mod exemption;
pub mod module;
pub mod params;

pub use address::AccAddress;
pub use amount::Amount;
pub use coin::{Coin, Coins, DecCoin, DecCoins};
pub use decimal::Decimal;
pub use error::TypesError;
pub use event::{Attribute, Event};
pub use exemption::ExemptionSet;
pub use params::TaxParams;
