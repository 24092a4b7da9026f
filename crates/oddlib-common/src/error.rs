//! Error types for oddlib-common.

use thiserror::Error;

/// Common error type for Oddlib operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A read would run past the end of the buffer.
    #[error("out of data: needed {needed} bytes but only {available} available")]
    OutOfData { needed: usize, available: usize },

    /// A seek target lies beyond the end of the buffer.
    #[error("invalid seek to {position} (buffer length {len})")]
    InvalidSeek { position: usize, len: usize },

    /// Invalid magic bytes encountered.
    #[error("invalid magic: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: Vec<u8>, actual: Vec<u8> },
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
