//! Error types for the rig checker.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom error.
pub type Result<T> = std::result::Result<T, CheckerError>;

/// Errors that can occur outside the evaluation engine.
///
/// The engine itself never fails: model errors are absorbed by the
/// heuristic fallback. These variants cover configuration, I/O, listing
/// search and the raw inference client.
#[derive(Error, Debug)]
pub enum CheckerError {
    /// Error reading or writing files.
    #[error("I/O error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A listing failed validation.
    #[error("Invalid listing: {0}")]
    Listing(#[from] ListingError),

    /// Inference endpoint error (non-success status, empty payload).
    #[error("Inference API error: {0}")]
    Inference(String),

    /// Inference call exceeded its time budget.
    #[error("Inference call timed out after {0} seconds")]
    Timeout(u64),

    /// The model returned a payload that violates the output contract.
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// Listing search API error.
    #[error("Listing search failed: {0}")]
    Search(String),

    /// HTTP request error.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Error during serialization/deserialization.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Validation errors raised when constructing a [`crate::Listing`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ListingError {
    #[error("price must be non-negative, got {0}")]
    NegativePrice(f64),

    #[error("price must be a finite number")]
    NonFinitePrice,
}

impl CheckerError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for CheckerError {
    fn from(err: reqwest::Error) -> Self {
        CheckerError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for CheckerError {
    fn from(err: serde_json::Error) -> Self {
        CheckerError::Serialization(err.to_string())
    }
}
