//! Frame pixel codecs.
//!
//! Every decoder takes the frame's compressed byte range and returns exactly
//! `actual_width * height` palette indices.

mod type3;
mod type4or5;

use crate::{Error, Result};

pub use type3::decompress_type3;
pub use type4or5::decompress_type4or5;

/// Compression tag from the frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Compression {
    /// Raw indices.
    Uncompressed,
    /// Run-length coding, no known decoder.
    Type1,
    /// Run-length coding, no known decoder.
    Type2,
    /// Per-row skip/copy runs.
    Type3,
    /// LZ bitstream.
    Type4,
    /// LZ bitstream, same layout as type 4.
    Type5,
    Type6,
    Type7,
    Type8,
}

impl Compression {
    pub fn from_tag(tag: u8) -> Result<Self> {
        Ok(match tag {
            0 => Self::Uncompressed,
            1 => Self::Type1,
            2 => Self::Type2,
            3 => Self::Type3,
            4 => Self::Type4,
            5 => Self::Type5,
            6 => Self::Type6,
            7 => Self::Type7,
            8 => Self::Type8,
            other => {
                return Err(Error::CorruptFrame(format!(
                    "unknown compression type {other}"
                )))
            }
        })
    }

    pub const fn tag(self) -> u8 {
        match self {
            Self::Uncompressed => 0,
            Self::Type1 => 1,
            Self::Type2 => 2,
            Self::Type3 => 3,
            Self::Type4 => 4,
            Self::Type5 => 5,
            Self::Type6 => 6,
            Self::Type7 => 7,
            Self::Type8 => 8,
        }
    }
}

/// Decompress one frame.
///
/// `width` is the width stored in the frame header; rows of the output are
/// `actual_width` bytes apart.
pub fn decompress(
    compression: Compression,
    input: &[u8],
    actual_width: u32,
    width: u32,
    height: u32,
) -> Result<Vec<u8>> {
    match compression {
        Compression::Uncompressed => copy_uncompressed(input, actual_width, height),
        Compression::Type1 | Compression::Type2 => Err(Error::NotImplemented(compression.tag())),
        Compression::Type3 => decompress_type3(input, actual_width, width, height),
        Compression::Type4 | Compression::Type5 => {
            decompress_type4or5(input, actual_width, height)
        }
        Compression::Type6 | Compression::Type7 | Compression::Type8 => Err(Error::CorruptFrame(
            format!("compression type {} is never used by sprites", compression.tag()),
        )),
    }
}

fn copy_uncompressed(input: &[u8], actual_width: u32, height: u32) -> Result<Vec<u8>> {
    let size = actual_width as usize * height as usize;
    let bytes = input
        .get(..size)
        .ok_or(oddlib_common::Error::OutOfData {
            needed: size,
            available: input.len(),
        })?;
    Ok(bytes.to_vec())
}
