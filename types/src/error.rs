//! Errors raised by the value types themselves (parsing, arithmetic).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid denomination: {0}")]
    InvalidDenom(String),

    #[error("duplicate denomination: {0}")]
    DuplicateDenom(String),

    #[error("invalid coin: {0}")]
    InvalidCoin(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid decimal: {0}")]
    InvalidDecimal(String),

    #[error("negative amount: {0}")]
    NegativeAmount(String),

    #[error("insufficient coins: have {have}, need {need}")]
    InsufficientCoins { have: String, need: String },

    #[error("arithmetic overflow")]
    Overflow,

    #[error("division by zero")]
    DivisionByZero,

    #[error("serialization error: {0}")]
    Serialization(String),
}
