//! Error types for the fluency-core library.
//!
//! The analysis stages themselves are total and never fail. Errors only arise
//! at the boundary: reading configuration, parsing session files and
//! validating caller-supplied selections.

use thiserror::Error;

/// Main error type for the fluency library.
#[derive(Error, Debug)]
pub enum FluencyError {
    /// Session input failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Stored record could not be normalized.
    #[error("history error: {0}")]
    History(#[from] HistoryError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while normalizing historical session records.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// The record declares a schema version this build does not understand.
    #[error("unsupported schema version: {0}")]
    UnsupportedVersion(u32),

    /// A required field is missing from the stored record.
    #[error("missing field: {0}")]
    MissingField(String),
}

/// Result type for the fluency library.
pub type Result<T> = std::result::Result<T, FluencyError>;
