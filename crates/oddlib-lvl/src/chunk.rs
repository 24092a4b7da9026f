//! Chunk views and resource type tags.

use std::fmt;

/// Four-character resource type code.
///
/// Stored on disk as a little-endian u32 whose low byte is the first
/// character, so `Anim` reads as `0x6D696E41`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResourceType(pub [u8; 4]);

impl ResourceType {
    /// Sprite animation set.
    pub const ANIM: Self = Self(*b"Anim");
    /// Level path (cameras, collision lines, objects).
    pub const PATH: Self = Self(*b"Path");
    /// Camera background image.
    pub const BITS: Self = Self(*b"Bits");
    /// Foreground layer.
    pub const FG1: Self = Self(*b"FG1 ");
    /// Font.
    pub const FONT: Self = Self(*b"Font");
    /// Padding between chunks, never surfaced as a chunk.
    pub const PAD: Self = Self(*b"Pad ");
    /// Terminates a file's chunk list.
    pub const END: Self = Self(*b"End!");

    /// Create a type from its four characters.
    pub const fn new(code: [u8; 4]) -> Self {
        Self(code)
    }

    /// Create a type from the raw on-disk value.
    pub const fn from_u32(value: u32) -> Self {
        Self(value.to_le_bytes())
    }

    /// The raw on-disk value.
    pub const fn to_u32(self) -> u32 {
        u32::from_le_bytes(self.0)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '?'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// A chunk inside an LVL file.
///
/// This is a lightweight view (offset + length) into the archive buffer; use
/// [`crate::LvlArchive::read_data`] to copy the bytes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LvlChunk {
    resource_type: ResourceType,
    id: u32,
    ref_count: u32,
    /// Absolute offset of the chunk data (after the header) in the archive.
    offset: usize,
    /// Length of the chunk data, excluding the header.
    len: usize,
}

impl LvlChunk {
    pub(crate) fn new(
        resource_type: ResourceType,
        id: u32,
        ref_count: u32,
        offset: usize,
        len: usize,
    ) -> Self {
        Self {
            resource_type,
            id,
            ref_count,
            offset,
            len,
        }
    }

    /// The chunk's type tag.
    #[inline]
    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// The chunk's resource id.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Reference count stored in the header (runtime bookkeeping in the game).
    #[inline]
    pub fn ref_count(&self) -> u32 {
        self.ref_count
    }

    /// Absolute byte offset of the data within the archive.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length of the data in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the chunk carries no data.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
