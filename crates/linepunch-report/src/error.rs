//! Report error types

use thiserror::Error;

/// Result type for report operations
pub type ReportResult<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while building or writing reports
#[derive(Debug, Error)]
pub enum ReportError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Directory traversal error
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] linepunch_core::Error),
}
