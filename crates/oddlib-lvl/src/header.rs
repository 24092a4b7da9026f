//! On-disk LVL structures.

use oddlib_common::le::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Size of one archive sector; file data always starts on a sector boundary.
pub const SECTOR_SIZE: usize = 2048;

/// Archive header at offset 0.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct LvlHeader {
    /// Byte offset of the first file (end of the directory).
    pub first_file_offset: U32,
    pub null1: U32,
    /// Always `Indx`.
    pub magic: U32,
    pub null2: U32,
    /// Number of file records following the header.
    pub file_count: U32,
    pub reserved: [U32; 3],
}

impl LvlHeader {
    /// `Indx` read as a little-endian u32.
    pub const MAGIC: u32 = u32::from_le_bytes(*b"Indx");
}

/// Directory entry for one file.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct FileRecord {
    /// NUL-padded 8.3 file name.
    pub name: [u8; 12],
    pub start_sector: U32,
    pub sector_count: U32,
    /// Exact size in bytes (the sector count is rounded up).
    pub file_size: U32,
}

impl FileRecord {
    /// The file name up to the first NUL.
    pub fn name(&self) -> String {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.name.len());
        String::from_utf8_lossy(&self.name[..end]).into_owned()
    }

    /// Absolute byte offset of the file's data.
    pub fn offset(&self) -> usize {
        self.start_sector.get() as usize * SECTOR_SIZE
    }
}

/// Header in front of every chunk inside a file.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct ChunkHeader {
    /// Size of the chunk including this header.
    pub size: U32,
    pub ref_count: U32,
    pub resource_type: U32,
    pub id: U32,
}

impl ChunkHeader {
    /// Size of the header itself.
    pub const SIZE: usize = std::mem::size_of::<ChunkHeader>();
}
