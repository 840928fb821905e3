//! Error types for the aduana-core library.

use thiserror::Error;

/// Main error type for the aduana library.
#[derive(Error, Debug)]
pub enum AduanaError {
    /// Record extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning text or table cells into records.
///
/// Most extraction steps signal "nothing found" with an empty result rather
/// than an error; these variants are reserved for genuine faults.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Failed to parse a captured value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },

    /// A table grid was structurally unusable.
    #[error("invalid table: {reason}")]
    InvalidTable { reason: String },
}

impl ExtractionError {
    pub(crate) fn parse(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Parse {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Result type for the aduana library.
pub type Result<T> = std::result::Result<T, AduanaError>;
