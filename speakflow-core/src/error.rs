//! Error types for speakflow-core
//!
//! Normalization itself never fails; these errors come from the I/O around it
//! (configuration, the document store and the analysis backend).

use thiserror::Error;

/// Main error type for the speakflow-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Analysis backend / summary API error
    #[error("API error: {0}")]
    Api(String),

    /// Document store error (bad layout, invalid identifiers)
    #[error("store error: {0}")]
    Store(String),

    /// Presentation document not found
    #[error("presentation not found: {0}")]
    NotFound(String),
}

/// Result type alias for speakflow-core
pub type Result<T> = std::result::Result<T, Error>;
