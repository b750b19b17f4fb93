//! Command-line encoder for the queue wire protocol.
//!
//! This crate provides the `nsqwire` binary, which builds one command from
//! its arguments and writes the encoded frame to stdout or a file.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use error::{CliError, CliResult};
