//! Error types for sound banks.

use thiserror::Error;

/// Errors that can occur when reading sound banks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] oddlib_common::Error),

    /// The header does not start with `pBAV`.
    #[error("invalid VAB magic: expected 'pBAV', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// A tone references a sample that was not supplied.
    #[error("program {program} tone {tone} uses sample {vag} but only {available} samples exist")]
    SampleOutOfRange {
        program: usize,
        tone: usize,
        vag: i16,
        available: usize,
    },
}

/// Result type for audio operations.
pub type Result<T> = std::result::Result<T, Error>;
