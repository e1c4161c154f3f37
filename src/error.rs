//! Error types for ticket-csv
//!
//! This module provides the error taxonomy for the whole pipeline:
//! - A crate-wide [`Error`] with contextual variants (config key, directory path, file name)
//! - [`FetchError`] for a single download attempt
//! - [`AggregateError`] for failures while merging downloaded files
//! - Machine-readable error codes for the command line surface
//!
//! Only [`Error::DirectoryCreate`] (and startup configuration problems) is meant to
//! abort a run; everything else is recovered locally by the component that hits it.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ticket-csv operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ticket-csv
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "fetch.retry.max_attempts")
        key: Option<String>,
    },

    /// A run directory could not be created; the run cannot proceed
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The source message file does not exist
    #[error("email not found: {0}")]
    InputNotFound(PathBuf),

    /// The source message could not be read or decoded
    #[error("failed to parse email: {0}")]
    Parse(String),

    /// Download-related error
    #[error("download error: {0}")]
    Fetch(#[from] FetchError),

    /// Aggregation-related error
    #[error("aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A single failed download attempt
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with a non-2xx status
    #[error("HTTP {0}")]
    Status(u16),

    /// Transport-level failure (DNS, connect, timeout, body read)
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// Writing the payload to disk failed
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The link is not a usable absolute URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors raised while merging downloaded files
#[derive(Debug, Error)]
pub enum AggregateError {
    /// An input file could not be read or parsed
    #[error("failed to read {file}: {reason}")]
    Read {
        /// File name inside the raw directory
        file: String,
        /// Reason reported by the reader
        reason: String,
    },

    /// The combined output could not be written
    #[error("failed to write {path}: {reason}")]
    Write {
        /// Combined output path
        path: PathBuf,
        /// Reason reported by the writer
        reason: String,
    },
}

impl Error {
    /// Machine-readable error code, used in console diagnostics
    pub fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::DirectoryCreate { .. } => "directory_create_failed",
            Error::InputNotFound(_) => "input_not_found",
            Error::Parse(_) => "parse_failure",
            Error::Fetch(e) => match e {
                FetchError::Status(_) => "http_status",
                FetchError::Network(_) => "network_error",
                FetchError::Io(_) => "write_failed",
                FetchError::InvalidUrl(_) => "invalid_url",
            },
            Error::Aggregate(e) => match e {
                AggregateError::Read { .. } => "file_read_failed",
                AggregateError::Write { .. } => "file_write_failed",
            },
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
        }
    }

    /// Whether this error must abort the run instead of being logged and skipped
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::DirectoryCreate { .. } | Error::Config { .. })
    }
}
