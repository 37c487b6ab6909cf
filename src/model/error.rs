//! Error types for convlist.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error of the binary
//!   - [`InputError`] - Conversation data could not be read
//!   - [`ParseError`] - One JSONL line could not be decoded
//!   - [`ConfigError`](crate::config::ConfigError) - Config file unreadable or invalid
//!   - [`LoggingError`](crate::logging::LoggingError) - Tracing setup failed
//!   - `std::io::Error` - Terminal failures
//!
//! # Recovery
//!
//! Parse errors are non-fatal: the offending line is logged and skipped, and the
//! list shows whatever parsed. Everything else is fatal to the front end.
//! The list engine itself never fails; anomalies degrade to placeholder rows.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read conversation data.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// Failed to decode a conversation record.
    #[error("Failed to parse conversation: {0}")]
    Parse(#[from] ParseError),

    /// Failed to load configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Failed to initialize logging.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Terminal or rendering error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors encountered when reading conversation data.
#[derive(Debug, Error)]
pub enum InputError {
    /// The data file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// Generic I/O failure while reading.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to decode one line of a JSONL conversation file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Line is not valid JSON or does not match the record shape.
    #[error("Invalid JSON at line {line}: {message}")]
    InvalidJson {
        /// 1-based line number.
        line: usize,
        /// Decoder message.
        message: String,
    },
}
