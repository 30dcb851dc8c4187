//! Error types for the recibo-core library.

use thiserror::Error;

/// Main error type for the recibo library.
///
/// The scanners themselves are total functions: a field that cannot be
/// extracted is an absent value, never an error. Errors only arise at the
/// pipeline boundary (the external analyzer) and in config plumbing.
#[derive(Error, Debug)]
pub enum ReciboError {
    /// External analyzer error.
    #[error("analyzer error: {0}")]
    Analyzer(#[from] AnalyzerError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reported by an external receipt analyzer.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// The analyzer is not configured or reachable.
    #[error("analyzer unavailable: {0}")]
    Unavailable(String),

    /// The analyzer ran but failed to produce a result.
    #[error("analysis failed: {0}")]
    Failed(String),

    /// The analyzer returned data that does not match the field contract.
    #[error("malformed analyzer response: {0}")]
    Contract(String),
}

/// Result type for the recibo library.
pub type Result<T> = std::result::Result<T, ReciboError>;
