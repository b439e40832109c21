//! Error types for the entire library.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised while validating a profile configuration.
///
/// These surface at decoration time, never when the wrapped callable runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Unknown sort key: {0:?}")]
    UnknownSortKey(String),

    #[error("Ambiguous sort key {key:?} (matches {candidates})")]
    AmbiguousSortKey { key: String, candidates: String },
}

/// Errors that can occur during report output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors returned by a profiled call
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to write profile report: {0}")]
    Output(#[from] OutputError),
}
