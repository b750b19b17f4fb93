//! CLI error types.

use std::io;
use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid or missing command-line argument.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// Building or writing a command failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] nsqwire_protocol::ProtocolError),

    /// Core value error (message ids).
    #[error("{0}")]
    Core(#[from] nsqwire_core::CoreError),

    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (input files, output sink).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
