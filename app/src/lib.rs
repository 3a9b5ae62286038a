//! Tax pipeline application.
//!
//! Wires the router, the tax engine and the native handlers into a
//! transaction executor with all-or-nothing commits, and provides the
//! configuration, genesis and logging around it.

pub mod app;
pub mod config;
pub mod error;
pub mod genesis;
pub mod logging;
pub mod native;

pub use app::{App, Tx, TxResult};
pub use config::AppConfig;
pub use error::AppError;
pub use genesis::{init_genesis, GenesisBalance, GenesisState, GenesisStore};
pub use logging::{init_logging, LogFormat};
pub use native::NativeHandler;

use lunc_nullables::NullChain;

/// In-memory app built from a configuration file's genesis and authority.
pub fn app_from_config(config: &AppConfig) -> Result<App<NullChain>, AppError> {
    App::from_genesis(NullChain::new(), &config.genesis, config.authority()?)
}
