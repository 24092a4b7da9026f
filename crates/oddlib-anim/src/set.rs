//! Animation set parsing.

use std::collections::BTreeSet;

use log::debug;
use oddlib_common::le::{I16, U16, U32};
use oddlib_common::ByteCursor;
use rustc_hash::FxHashSet;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::codec::{self, Compression};
use crate::frame::{ColourDepth, Frame, FrameHeader};
use crate::palette::Palette;
use crate::{Error, Result};

/// Upper bound on group starts visited while discovering groups.
pub const MAX_DISCOVERY_STEPS: usize = 4096;

/// Distance from the end of the buffer to resume at after a zero-frame group.
const ZERO_FRAME_RESUME: usize = 0x14;

/// Which game the set comes from; the two differ only in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AnimVariant {
    /// Abe's Oddysee: the palette size directly follows the frame table offset.
    Ao,
    /// Abe's Exoddus: a zero word precedes the palette size.
    Ae,
}

/// Fixed fields at the start of a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnimHeader {
    pub max_width: u16,
    pub max_height: u16,
    pub frame_table_offset: u32,
    pub palette_size: u32,
}

/// Collision rectangle of a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CollisionRect {
    pub x: i16,
    pub y: i16,
    pub w: i16,
    pub h: i16,
}

/// Per-frame placement data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FrameInfo {
    pub frame_header_offset: u32,
    /// Selects how much trailing data follows the record.
    pub magic: u32,
    pub collision: CollisionRect,
    pub offset_x: i16,
    pub offset_y: i16,
}

/// One animation: a run of frames sharing playback settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnimationHeader {
    /// Offset of this group within the set.
    pub offset: u32,
    pub fps: u16,
    pub frame_count: u16,
    pub loop_start_frame: u16,
    pub flags: u16,
    pub frame_info_offsets: Vec<u32>,
    pub frame_infos: Vec<FrameInfo>,
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
struct GroupRecord {
    fps: U16,
    frame_count: U16,
    loop_start_frame: U16,
    flags: U16,
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
struct FrameInfoRecord {
    frame_header_offset: U32,
    magic: U32,
    collision_x: I16,
    collision_y: I16,
    collision_w: I16,
    collision_h: I16,
    offset_x: I16,
    offset_y: I16,
}

impl From<FrameInfoRecord> for FrameInfo {
    fn from(r: FrameInfoRecord) -> Self {
        Self {
            frame_header_offset: r.frame_header_offset.get(),
            magic: r.magic.get(),
            collision: CollisionRect {
                x: r.collision_x.get(),
                y: r.collision_y.get(),
                w: r.collision_w.get(),
                h: r.collision_h.get(),
            },
            offset_x: r.offset_x.get(),
            offset_y: r.offset_y.get(),
        }
    }
}

/// A parsed animation set.
///
/// Owns a copy of the chunk bytes so frames can be decoded on demand.
#[derive(Clone)]
pub struct AnimationSet {
    data: Vec<u8>,
    header: AnimHeader,
    variant: AnimVariant,
    palette: Palette,
    animations: Vec<AnimationHeader>,
    /// Unique frame header offsets, ascending.
    frame_offsets: Vec<u32>,
    /// Frame header offsets plus the frame table offset, ascending.
    boundaries: Vec<u32>,
}

impl AnimationSet {
    /// Parse a set, detecting the variant from the header.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_inner(data, None)
    }

    /// Parse a set as a known variant.
    pub fn parse_as(data: &[u8], variant: AnimVariant) -> Result<Self> {
        Self::parse_inner(data, Some(variant))
    }

    fn parse_inner(data: &[u8], forced: Option<AnimVariant>) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);

        let max_width = cursor.read_u16()?;
        let max_height = cursor.read_u16()?;
        let frame_table_offset = cursor.read_u32()?;
        let mut palette_size = cursor.read_u32()?;

        let variant = match forced {
            Some(v) => v,
            None if palette_size == 0 => AnimVariant::Ae,
            None => AnimVariant::Ao,
        };
        if variant == AnimVariant::Ae {
            palette_size = cursor.read_u32()?;
            debug!("Ae set, palette size re-read as {palette_size}");
        }

        let palette = Palette::read(&mut cursor, palette_size as usize)?;
        let header = AnimHeader {
            max_width,
            max_height,
            frame_table_offset,
            palette_size,
        };

        let mut animations = discover_groups(&mut cursor, frame_table_offset)?;
        for animation in &mut animations {
            animation.frame_infos = read_frame_infos(&mut cursor, &animation.frame_info_offsets)?;
        }

        let frame_offsets: BTreeSet<u32> = animations
            .iter()
            .flat_map(|a| a.frame_infos.iter().map(|f| f.frame_header_offset))
            .collect();
        let mut boundaries = frame_offsets.clone();
        boundaries.insert(frame_table_offset);

        debug!(
            "parsed {:?} set: {} animations, {} unique frames",
            variant,
            animations.len(),
            frame_offsets.len()
        );

        Ok(Self {
            data: data.to_vec(),
            header,
            variant,
            palette,
            animations,
            frame_offsets: frame_offsets.into_iter().collect(),
            boundaries: boundaries.into_iter().collect(),
        })
    }

    #[inline]
    pub fn header(&self) -> &AnimHeader {
        &self.header
    }

    #[inline]
    pub fn variant(&self) -> AnimVariant {
        self.variant
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Animations in discovery order.
    #[inline]
    pub fn animations(&self) -> &[AnimationHeader] {
        &self.animations
    }

    #[inline]
    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    #[inline]
    pub fn frame_table_offset(&self) -> u32 {
        self.header.frame_table_offset
    }

    /// Unique frame header offsets, ascending.
    #[inline]
    pub fn frame_offsets(&self) -> &[u32] {
        &self.frame_offsets
    }

    /// Frame header offsets plus the frame table offset, ascending.
    #[inline]
    pub fn unique_offsets(&self) -> &[u32] {
        &self.boundaries
    }

    /// Number of unique frames.
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frame_offsets.len()
    }

    /// The raw set bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size of the compressed data of the frame at `offset`.
    ///
    /// Measured up to the next known boundary, minus the frame header.
    pub fn frame_data_size(&self, offset: u32) -> Result<usize> {
        let index = self
            .boundaries
            .binary_search(&offset)
            .map_err(|_| Error::CorruptAnimationSet(format!("{offset:#x} is not a frame offset")))?;
        let next = self.boundaries.get(index + 1).ok_or_else(|| {
            Error::CorruptAnimationSet(format!("frame at {offset:#x} has no end boundary"))
        })?;

        ((next - offset) as usize)
            .checked_sub(FrameHeader::SIZE)
            .ok_or_else(|| {
                Error::CorruptAnimationSet(format!(
                    "frame at {offset:#x} is smaller than its header"
                ))
            })
    }

    /// Decode the frame whose header is at `offset`.
    pub fn decode_frame(&self, offset: u32) -> Result<Frame> {
        let data_size = self.frame_data_size(offset)?;
        let end = offset as usize + FrameHeader::SIZE + data_size;
        if end > self.data.len() {
            return Err(Error::CorruptFrame(format!(
                "frame at {offset:#x} extends to {end:#x} past the {:#x} byte set",
                self.data.len()
            )));
        }

        let mut cursor = ByteCursor::new_at(&self.data, offset as usize)?;
        let header: FrameHeader = cursor.read_struct()?;

        let colour_depth = ColourDepth::from_bits(header.colour_depth)?;
        let compression = Compression::from_tag(header.compression)?;
        let width = header.width as u32;
        let height = header.height as u32;
        let (texture_width, actual_width) = colour_depth.widths(width);

        let input = cursor.read_bytes(data_size)?;

        let pixels = codec::decompress(compression, input, actual_width, width, height)?;

        Ok(Frame {
            offset,
            width,
            height,
            colour_depth,
            compression,
            texture_width,
            actual_width,
            pixels,
        })
    }

    /// Decode every unique frame in offset order.
    pub fn frames(&self) -> impl Iterator<Item = Result<Frame>> + '_ {
        self.frame_offsets.iter().map(|&o| self.decode_frame(o))
    }

    /// Decode every unique frame, stopping at the first failure.
    pub fn decode_all_frames(&self) -> Result<Vec<Frame>> {
        self.frames().collect()
    }

    /// Decode every unique frame in parallel.
    #[cfg(feature = "parallel")]
    pub fn decode_all_frames_parallel(&self) -> Result<Vec<Frame>> {
        use rayon::prelude::*;

        self.frame_offsets
            .par_iter()
            .map(|&o| self.decode_frame(o))
            .collect()
    }
}

impl std::fmt::Debug for AnimationSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationSet")
            .field("variant", &self.variant)
            .field("header", &self.header)
            .field("animations", &self.animations.len())
            .field("frames", &self.frame_offsets.len())
            .finish()
    }
}

/// Trailing bytes after a frame info record, by its magic tag.
fn frame_info_skip(magic: u32) -> usize {
    match magic {
        0x3 => 0x14,
        0x7 | 0x9 => 0x2C,
        _ => 0x1C,
    }
}

fn read_group(cursor: &mut ByteCursor<'_>) -> Result<AnimationHeader> {
    let offset = cursor.position() as u32;
    let record: GroupRecord = cursor.read_struct()?;
    let frame_count = record.frame_count.get();

    let mut frame_info_offsets = Vec::with_capacity(frame_count as usize);
    for _ in 0..frame_count {
        frame_info_offsets.push(cursor.read_u32()?);
    }

    Ok(AnimationHeader {
        offset,
        fps: record.fps.get(),
        frame_count,
        loop_start_frame: record.loop_start_frame.get(),
        flags: record.flags.get(),
        frame_info_offsets,
        frame_infos: Vec::new(),
    })
}

/// Walk the group list starting at the frame table.
///
/// Groups are read back to back. Whenever a group ends exactly at the end of
/// the buffer, the walk jumps to just past the last frame info of that group
/// (or near the end of the buffer for an empty group). It finishes when it
/// arrives back at the frame table offset.
fn discover_groups(
    cursor: &mut ByteCursor<'_>,
    frame_table_offset: u32,
) -> Result<Vec<AnimationHeader>> {
    let table = frame_table_offset as usize;
    cursor.seek(table)?;

    let mut groups = Vec::new();
    let mut visited = FxHashSet::default();

    for _ in 0..MAX_DISCOVERY_STEPS {
        let start = cursor.position();
        if !visited.insert(start) {
            return Err(Error::CorruptAnimationSet(format!(
                "group discovery revisited {start:#x} without returning to the frame table"
            )));
        }

        let group = read_group(cursor)?;
        debug!(
            "group at {start:#x}: {} frames, {} fps",
            group.frame_count, group.fps
        );

        if cursor.at_end() {
            match group.frame_info_offsets.last() {
                None => {
                    let resume = cursor.len().checked_sub(ZERO_FRAME_RESUME).ok_or_else(|| {
                        Error::CorruptAnimationSet(format!(
                            "empty group at end of a {} byte set",
                            cursor.len()
                        ))
                    })?;
                    debug!("empty group at end of set, resuming at {resume:#x}");
                    cursor.seek(resume)?;
                }
                Some(&last) => {
                    let last = last as usize;
                    cursor.seek(last)?;
                    let _frame_header_offset = cursor.read_u32()?;
                    let magic = cursor.read_u32()?;
                    cursor.seek(last + frame_info_skip(magic))?;
                }
            }
        }

        groups.push(group);

        if cursor.position() == table {
            return Ok(groups);
        }
    }

    Err(Error::CorruptAnimationSet(format!(
        "no return to the frame table after {MAX_DISCOVERY_STEPS} groups"
    )))
}

fn read_frame_infos(cursor: &mut ByteCursor<'_>, offsets: &[u32]) -> Result<Vec<FrameInfo>> {
    offsets
        .iter()
        .map(|&offset| {
            cursor.seek(offset as usize)?;
            let record: FrameInfoRecord = cursor.read_struct()?;
            Ok(record.into())
        })
        .collect()
}
