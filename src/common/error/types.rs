//! Unified error type for docfill.
//!
//! Errors from the package, XML, and document layers are folded into one
//! enum so callers deal with a single `Result` alias.
use thiserror::Error;

/// Main error type for docfill operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Package part not found
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Main document part has an unexpected content type
    #[error("Invalid content type: expected {expected}, got {got}")]
    InvalidContentType { expected: String, got: String },

    /// Invalid or unsupported package layout
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A repeating section names a context value that is not a list of records
    #[error("Section '{section}' expects a list of records, found {found}")]
    InvalidContext { section: String, found: String },

    /// Field configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for docfill operations.
pub type Result<T> = std::result::Result<T, Error>;
