//! Error types for the console.
//!
//! Worker-level failures never cross the worker boundary: each worker logs
//! its own error and flips its status to `Stopped`; the supervisor only
//! observes the status transition.

use std::io;

use thiserror::Error;

/// Errors on the serial link and the line codec shared by both directions.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The serial device could not be opened. Fatal at startup.
    #[error("failed to open {device} at {baud} baud: {source}")]
    Open {
        device: String,
        baud: u32,
        #[source]
        source: tokio_serial::Error,
    },

    /// A line contained a byte outside the ASCII range.
    #[error("line contains a non-ASCII byte")]
    NotAscii,

    /// I/O failure on the link or the operator terminal, including
    /// operations that race with link closure.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Errors building the runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid baud rate '{value}': {source}")]
    InvalidBaud {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}
