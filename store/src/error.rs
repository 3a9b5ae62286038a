use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("insufficient funds: {address} has {available}, needs {required}")]
    InsufficientFunds {
        address: String,
        available: String,
        required: String,
    },

    #[error("unknown module account: {0}")]
    UnknownModule(String),

    #[error("key not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("coin arithmetic: {0}")]
    Coins(#[from] lunc_types::TypesError),
}
