//! Errors raised while parsing or validating fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid data hash: {0}")]
    InvalidHash(String),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParam { name: &'static str, reason: String },
}
