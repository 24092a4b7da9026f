//! Animation set palettes.

use oddlib_common::color::{is_transparent, rgb555_to_rgb565, rgb565_to_rgba8};
use oddlib_common::ByteCursor;

use crate::{Frame, Result};

/// One palette colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PaletteEntry {
    /// Packed 5-6-5 colour.
    pub colour: u16,
    /// Bit 15 of the stored entry.
    pub transparent: bool,
}

impl PaletteEntry {
    /// Convert a stored 5-5-5 entry.
    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self {
            colour: rgb555_to_rgb565(raw),
            transparent: is_transparent(raw),
        }
    }

    /// Expand to RGBA.
    ///
    /// Black without the transparency bit is the console's "fully
    /// transparent" colour; everything else is opaque.
    #[inline]
    pub const fn to_rgba8(self) -> [u8; 4] {
        let alpha = if self.colour == 0 && !self.transparent {
            0
        } else {
            0xFF
        };
        rgb565_to_rgba8(self.colour, alpha)
    }
}

/// Colour lookup table shared by every frame of a set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Read `size` stored entries.
    pub fn read(cursor: &mut ByteCursor<'_>, size: usize) -> Result<Self> {
        // Bound the allocation by what the buffer can actually hold
        cursor.peek_bytes(size.saturating_mul(2))?;

        let mut entries = Vec::with_capacity(size);
        for _ in 0..size {
            entries.push(PaletteEntry::from_raw(cursor.read_u16()?));
        }
        Ok(Self { entries })
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<PaletteEntry> {
        self.entries.get(index).copied()
    }

    #[inline]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Map a frame's indices to 5-6-5 colours.
    ///
    /// Indices past the end of the palette map to black.
    pub fn apply(&self, frame: &Frame) -> Vec<u16> {
        frame
            .pixels
            .iter()
            .map(|&i| self.get(i as usize).map_or(0, |e| e.colour))
            .collect()
    }

    /// Map a frame's indices to packed RGBA8, four bytes per pixel.
    pub fn to_rgba8(&self, frame: &Frame) -> Vec<u8> {
        frame
            .pixels
            .iter()
            .flat_map(|&i| {
                self.get(i as usize)
                    .map_or([0, 0, 0, 0], PaletteEntry::to_rgba8)
            })
            .collect()
    }
}
