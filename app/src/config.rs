//! Application configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use lunc_tax::params::GOV_MODULE;
use lunc_types::AccAddress;

use crate::genesis::GenesisState;
use crate::logging::LogFormat;
use crate::AppError;

/// Configuration for the tax application.
///
/// Can be loaded from a TOML file via [`AppConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log output format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Default log filter, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Bech32 address allowed to update tax params. Defaults to the
    /// governance module account.
    #[serde(default)]
    pub authority: Option<String>,

    #[serde(default)]
    pub genesis: GenesisState,
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AppError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, AppError> {
        toml::from_str(s).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, AppError> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn log_format(&self) -> Result<LogFormat, AppError> {
        self.log_format.parse()
    }

    pub fn authority(&self) -> Result<AccAddress, AppError> {
        match &self.authority {
            Some(addr) => addr
                .parse()
                .map_err(|e| AppError::Config(format!("authority: {e}"))),
            None => Ok(AccAddress::module(GOV_MODULE)),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
            authority: None,
            genesis: GenesisState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunc_types::Decimal;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = AppConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = AppConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.log_format, "human");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.genesis.params.burn_tax_rate, Decimal::permille(5));
        assert_eq!(config.authority().unwrap(), AccAddress::module(GOV_MODULE));
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            log_format = "json"

            [genesis]
            burn_split_rate = "0.1"

            [genesis.params]
            burn_tax_rate = "0.01"

            [[genesis.params.gas_prices]]
            denom = "uluna"
            amount = "28.325"
        "#;
        let config = AppConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.log_format().unwrap(), LogFormat::Json);
        assert_eq!(config.genesis.burn_split_rate, Decimal::percent(10));
        assert_eq!(config.genesis.params.burn_tax_rate, Decimal::percent(1));
        assert_eq!(config.genesis.params.gas_prices.len(), 1);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();
        let config = AppConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = AppConfig::from_toml_file("/nonexistent/lunc.toml");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn bad_authority_is_config_error() {
        let config = AppConfig {
            authority: Some("cosmos1bad".into()),
            ..AppConfig::default()
        };
        assert!(matches!(config.authority(), Err(AppError::Config(_))));
    }
}
