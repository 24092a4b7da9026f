//! Error types for path data.

use thiserror::Error;

/// Errors that can occur when reading path data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] oddlib_common::Error),

    /// The collision item table does not fit in the chunk.
    #[error("{count} collision items at {offset:#x} overrun a {len} byte chunk")]
    ItemsOutOfBounds {
        offset: usize,
        count: usize,
        len: usize,
    },
}

/// Result type for path operations.
pub type Result<T> = std::result::Result<T, Error>;
