//! Core error types.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while constructing core values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A message id was built from a slice of the wrong width.
    #[error("invalid message id length: {actual} bytes (expected {expected})")]
    InvalidLength { expected: usize, actual: usize },

    /// A message id string was not valid hex.
    #[error("invalid message id hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
