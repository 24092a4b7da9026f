//! Error types for the LVL crate.

use thiserror::Error;

/// Errors that can occur when working with LVL archives.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] oddlib_common::Error),

    /// The archive does not start with the `Indx` magic.
    #[error("invalid LVL magic: expected 'Indx', got {0:#010x}")]
    InvalidMagic(u32),

    /// A file record points outside the archive.
    #[error("file '{name}' spans {offset}..{end} but the archive is {len} bytes")]
    FileOutOfBounds {
        name: String,
        offset: usize,
        end: usize,
        len: usize,
    },

    /// A chunk header declares an impossible size.
    #[error("corrupt chunk at {offset:#x} in '{file}': {reason}")]
    CorruptChunk {
        file: String,
        offset: usize,
        reason: String,
    },

    /// A file or chunk lookup missed.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type for LVL operations.
pub type Result<T> = std::result::Result<T, Error>;
