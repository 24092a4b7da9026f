//! Common utilities for Oddlib.
//!
//! This crate provides the foundational types shared by every Oddlib format crate:
//!
//! - [`ByteCursor`] - Bounds-checked little-endian reading from byte slices
//! - [`crc`] - CRC32C content hashing (used for chunk deduplication)
//! - [`color`] - RGB555/RGB565/RGBA8 pixel conversions

mod cursor;
mod error;

pub mod color;
pub mod crc;

pub use cursor::ByteCursor;
pub use error::{Error, Result};

/// Re-export zerocopy traits and little-endian field types for record structs.
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
pub use zerocopy::byteorder::little_endian as le;
