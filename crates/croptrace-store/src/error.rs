use croptrace_canonical::BatchStatus;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A batch with the same business key already exists.
    #[error("batch '{0}' already exists")]
    DuplicateBatch(String),
    /// No batch with this business key exists.
    #[error("batch '{0}' not found")]
    NotFound(String),
    /// The requested status change moves backwards or re-asserts the
    /// current status.
    #[error("illegal status transition: {from:?} -> {to:?}")]
    InvalidTransition {
        /// Current status.
        from: BatchStatus,
        /// Requested status.
        to: BatchStatus,
    },
}
