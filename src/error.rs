//! Error types for Basalt
//!
//! Provides a unified error type for all operations. Engine errors pass
//! through unchanged; the only translation this layer performs is the
//! corruption -> repair -> retry sequence at open time.

use thiserror::Error;

/// Result type alias using BasaltError
pub type Result<T> = std::result::Result<T, BasaltError>;

/// Unified error type for Basalt operations
#[derive(Debug, Error)]
pub enum BasaltError {
    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    /// Returned by `get` when the key is absent. `has` never raises this;
    /// it reports `Ok(false)` instead.
    #[error("key not found")]
    NotFound,

    // -------------------------------------------------------------------------
    // Open / Recovery Errors
    // -------------------------------------------------------------------------
    /// On-disk corruption detected at open time that the repair pass could
    /// not salvage. Fatal for the open.
    #[error("store corrupted and unrecoverable: {0}")]
    Corrupted(String),

    // -------------------------------------------------------------------------
    // Engine Errors
    // -------------------------------------------------------------------------
    /// Any error surfaced by the wrapped engine (I/O, disk full, permission,
    /// lock contention). Propagated unchanged, never swallowed.
    #[error("engine error: {0}")]
    Engine(#[from] rocksdb::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Batch Errors
    // -------------------------------------------------------------------------
    /// A batch replay stopped at the first entry the target sink rejected.
    /// Entries staged before the failing one were already applied.
    #[error("batch replay failed: {0}")]
    Replay(#[source] Box<BasaltError>),
}

impl BasaltError {
    /// True if this error is the absent-key signal from `get`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BasaltError::NotFound)
    }
}
