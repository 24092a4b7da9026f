//! Error types for animation decoding.

use thiserror::Error;

/// Errors that can occur when decoding animation sets and frames.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Common library error (short reads, bad seeks).
    #[error("{0}")]
    Common(#[from] oddlib_common::Error),

    /// The group structure of the set could not be recovered.
    #[error("corrupt animation set: {0}")]
    CorruptAnimationSet(String),

    /// The frame uses a codec with no known decoder.
    #[error("compression type {0} is not implemented")]
    NotImplemented(u8),

    /// The frame header or compressed stream is invalid.
    #[error("corrupt frame: {0}")]
    CorruptFrame(String),
}

/// Result type for animation operations.
pub type Result<T> = std::result::Result<T, Error>;
