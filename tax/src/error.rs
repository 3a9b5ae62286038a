//! Tax pipeline errors and their stable result codes.

use lunc_store::StoreError;
use lunc_types::TypesError;
use thiserror::Error;

/// Codespace reported alongside every non-zero result code.
pub const CODESPACE: &str = "tax";

#[derive(Debug, Error)]
pub enum TaxError {
    #[error("insufficient funds: {payer} has {available}, needs {required}")]
    InsufficientFunds {
        payer: String,
        available: String,
        required: String,
    },

    #[error("inconsistent multi-send: inputs {inputs} != outputs {outputs}")]
    InconsistentMultiSend { inputs: String, outputs: String },

    #[error("unknown address: {0}")]
    UnknownAddress(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invariant violated: {0}")]
    InvariantViolated(String),

    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error("unauthorized: expected {expected}, got {got}")]
    Unauthorized { expected: String, got: String },

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("arithmetic error: {0}")]
    Arithmetic(TypesError),
}

impl TaxError {
    /// Machine-readable result code (0 is reserved for success).
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidAddress(_) => 2,
            Self::InsufficientFunds { .. } => 3,
            Self::InconsistentMultiSend { .. } => 4,
            Self::UnknownAddress(_) => 5,
            Self::InvariantViolated(_) => 6,
            Self::InvalidParams(_) => 7,
            Self::Unauthorized { .. } => 8,
            Self::Store(_) => 9,
            Self::Arithmetic(_) => 10,
        }
    }
}

impl From<StoreError> for TaxError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InsufficientFunds {
                address,
                available,
                required,
            } => Self::InsufficientFunds {
                payer: address,
                available,
                required,
            },
            StoreError::Coins(inner) => Self::from(inner),
            other => Self::Store(other),
        }
    }
}

impl From<TypesError> for TaxError {
    fn from(err: TypesError) -> Self {
        match err {
            TypesError::InvalidAddress(addr) => Self::InvalidAddress(addr),
            other => Self::Arithmetic(other),
        }
    }
}
