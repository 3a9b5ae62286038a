//! Burn tax engine.
//!
//! Computes burn tax on transferred coins, collects it from the payer into the
//! fee collector, splits it between the burn, oracle and community sinks, and
//! records the proceeds with the treasury. Message interception lives in
//! `lunc-router`; this crate only knows about coins, payers and the
//! request-scoped [`TaxContext`].

pub mod ante;
pub mod collector;
pub mod compute;
pub mod context;
pub mod error;
pub mod exemption;
pub mod params;
pub mod query;
pub mod settle;
pub mod split;
pub mod sweep;

pub use ante::{prepare, AntePlan, FeeInfo};
pub use collector::{deduct_tax, pass_through};
pub use compute::compute_tax;
pub use context::{TaxContext, TaxStage};
pub use error::{TaxError, CODESPACE};
pub use exemption::{has_contract_exemption, has_pair_exemption};
pub use params::{get_params, set_params, ParamsKeeper, PARAMS_KEY};
pub use settle::settle;
pub use split::{split_taxes, SplitOutcome};
pub use sweep::sweep_burn_account;
