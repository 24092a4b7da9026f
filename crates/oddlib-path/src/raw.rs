//! Collision items as stored in path chunks.

use oddlib_common::le::{I16, U16};
use oddlib_common::ByteCursor;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Result};

/// Unresolved link slot: indices into the item table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RawLink {
    pub previous: i16,
    pub next: i16,
}

/// One collision item before its links are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RawCollisionItem {
    pub p1: (i16, i16),
    pub p2: (i16, i16),
    pub line_type: u16,
    /// Primary and optional link.
    pub links: [RawLink; 2],
    pub length: u16,
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
struct ItemRecord {
    p1_x: I16,
    p1_y: I16,
    p2_x: I16,
    p2_y: I16,
    line_type: U16,
    links: [[I16; 2]; 2],
    length: U16,
}

impl ItemRecord {
    const SIZE: usize = std::mem::size_of::<ItemRecord>();
}

impl From<ItemRecord> for RawCollisionItem {
    fn from(r: ItemRecord) -> Self {
        let link = |l: [I16; 2]| RawLink {
            previous: l[0].get(),
            next: l[1].get(),
        };
        Self {
            p1: (r.p1_x.get(), r.p1_y.get()),
            p2: (r.p2_x.get(), r.p2_y.get()),
            line_type: r.line_type.get(),
            links: [link(r.links[0]), link(r.links[1])],
            length: r.length.get(),
        }
    }
}

/// Read `count` 20-byte collision items starting at `offset`.
pub fn parse_collision_items(
    data: &[u8],
    offset: usize,
    count: usize,
) -> Result<Vec<RawCollisionItem>> {
    let fits = count
        .checked_mul(ItemRecord::SIZE)
        .and_then(|size| offset.checked_add(size))
        .is_some_and(|end| end <= data.len());
    if !fits {
        return Err(Error::ItemsOutOfBounds {
            offset,
            count,
            len: data.len(),
        });
    }

    let mut cursor = ByteCursor::new_at(data, offset)?;
    (0..count)
        .map(|_| {
            let record: ItemRecord = cursor.read_struct()?;
            Ok(record.into())
        })
        .collect()
}
