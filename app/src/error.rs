use lunc_store::StoreError;
use lunc_tax::TaxError;
use lunc_types::TypesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("tax error: {0}")]
    Tax(#[from] TaxError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("types error: {0}")]
    Types(#[from] TypesError),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid genesis: {0}")]
    Genesis(String),

    #[error("logging error: {0}")]
    Logging(String),
}
