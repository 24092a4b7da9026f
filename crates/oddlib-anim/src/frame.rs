//! Frame headers and decoded frames.

use oddlib_common::le::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::codec::Compression;
use crate::{Error, Result};

/// 12-byte header in front of every frame's compressed data.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct FrameHeader {
    pub magic: U32,
    pub width: u8,
    pub height: u8,
    pub colour_depth: u8,
    pub compression: u8,
    pub data_size: U32,
}

impl FrameHeader {
    pub const SIZE: usize = std::mem::size_of::<FrameHeader>();
}

/// Bits per pixel of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ColourDepth {
    Four,
    Eight,
    Sixteen,
}

impl ColourDepth {
    pub fn from_bits(bits: u8) -> Result<Self> {
        match bits {
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            16 => Ok(Self::Sixteen),
            other => Err(Error::CorruptFrame(format!(
                "unsupported colour depth {other}"
            ))),
        }
    }

    pub const fn bits(self) -> u8 {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
            Self::Sixteen => 16,
        }
    }

    /// Texture width and actual (decoded row) width for a frame `width` pixels wide.
    pub const fn widths(self, width: u32) -> (u32, u32) {
        match self {
            Self::Eight => {
                let texture = ((width + 3) / 2) & !1;
                (texture, texture * 2)
            }
            Self::Sixteen => {
                let texture = (width + 1) & !1;
                (texture, texture)
            }
            Self::Four => {
                let texture = ((width + 7) / 4) & !1;
                (texture, texture * 4)
            }
        }
    }
}

/// A decoded frame: one palette index byte per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Frame {
    /// Offset of the frame header within the set.
    pub offset: u32,
    /// Width from the frame header.
    pub width: u32,
    pub height: u32,
    pub colour_depth: ColourDepth,
    pub compression: Compression,
    pub texture_width: u32,
    /// Row stride of `pixels`.
    pub actual_width: u32,
    /// `actual_width * height` index bytes.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub pixels: Vec<u8>,
}

impl Frame {
    /// Indices of one row.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.actual_width as usize;
        let start = y as usize * stride;
        self.pixels.get(start..start + stride)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_size() {
        assert_eq!(FrameHeader::SIZE, 12);
    }

    #[test]
    fn test_widths() {
        assert_eq!(ColourDepth::Eight.widths(5), (4, 8));
        assert_eq!(ColourDepth::Eight.widths(4), (2, 4));
        assert_eq!(ColourDepth::Sixteen.widths(5), (6, 6));
        assert_eq!(ColourDepth::Four.widths(9), (4, 16));
        assert_eq!(ColourDepth::Four.widths(0), (0, 0));
    }

    #[test]
    fn test_unknown_depth() {
        assert!(matches!(
            ColourDepth::from_bits(24),
            Err(Error::CorruptFrame(_))
        ));
        assert_eq!(ColourDepth::from_bits(16).unwrap().bits(), 16);
    }
}
