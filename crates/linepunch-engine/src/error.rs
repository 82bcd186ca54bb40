//! Error types for linepunch-engine

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a row-insertion operation
///
/// Per-property failures during propagation never surface here; they are
/// collected as [`PropagationWarning`](crate::PropagationWarning)s instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The grid could not report an active cell to act on
    #[error("No active cell: {0}")]
    NoActiveCell(String),

    /// The requested row is outside the grid
    #[error("Invalid row {0}")]
    InvalidRow(u32),

    /// Physical row insertion failed; nothing was propagated
    #[error("Failed to insert a row below row {after}: {source}")]
    InsertFailed {
        after: u32,
        #[source]
        source: linepunch_core::Error,
    },

    /// Another action is still running against the grid
    #[error("An insertion is already in progress")]
    Busy,

    /// The background worker could not be started
    #[error("Failed to start action thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The background action panicked
    #[error("Action panicked: {0}")]
    ActionPanicked(String),

    /// Grid access failed outside the best-effort propagation steps
    #[error(transparent)]
    Grid(#[from] linepunch_core::Error),
}
