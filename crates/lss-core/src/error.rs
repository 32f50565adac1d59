//! Error types for lss-core

use thiserror::Error;

/// Result type alias using lss-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing split files
#[derive(Error, Debug)]
pub enum Error {
    /// Input is not well-formed XML (or not valid UTF-8)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A required field is missing or a field has the wrong cardinality
    #[error("Schema error at {path}: {message}")]
    Schema { path: String, message: String },

    /// A leaf value does not match its scalar encoding
    #[error("Format error at {path} ({field}): {source}")]
    Format {
        path: String,
        field: &'static str,
        #[source]
        source: FormatError,
    },

    /// The XML writer rejected the tree
    #[error("Write error: {0}")]
    Write(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn schema(path: &str, message: impl Into<String>) -> Self {
        Self::Schema {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// A scalar value that does not match its textual grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{value:?} is not a valid {expected}")]
pub struct FormatError {
    /// The offending text
    pub value: String,
    /// Human readable name of the expected encoding
    pub expected: &'static str,
}

impl FormatError {
    pub(crate) fn new(value: &str, expected: &'static str) -> Self {
        Self {
            value: value.to_string(),
            expected,
        }
    }
}
