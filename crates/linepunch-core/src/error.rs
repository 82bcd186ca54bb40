//! Grid errors

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by grid access
///
/// Every [`GridAccessor`](crate::GridAccessor) method reports failures with
/// this type. Callers in the analysis engine treat most of them as
/// non-fatal, per-property failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Row index out of bounds (rows are 1-indexed)
    #[error("Row index {0} out of bounds (valid: 1..={1})")]
    RowOutOfBounds(u32, u32),

    /// Column index out of bounds (columns are 1-indexed)
    #[error("Column index {0} out of bounds (valid: 1..={1})")]
    ColumnOutOfBounds(u32, u32),

    /// Merge region with a zero coordinate or extent
    #[error("Invalid merge region: {0}")]
    InvalidRegion(String),

    /// A merge would partially overlap an existing region
    #[error("Merge {0} partially overlaps existing region {1}")]
    MergedCellConflict(String, String),

    /// A property could not be read from the grid
    #[error("Cannot read {what} at row {row}, column {col}")]
    Unreadable {
        what: &'static str,
        row: u32,
        col: u32,
    },

    /// The backing grid does not support the operation
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("Sheet index {0} out of bounds (count: {1})")]
    SheetOutOfBounds(usize, usize),

    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// I/O error reading or writing a snapshot file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed snapshot document
    #[cfg(feature = "serde")]
    #[error("Snapshot error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
