//! LVL archive reader for Oddworld game files.
//!
//! Every level of the game ships as one `.LVL` archive: a sector-aligned
//! directory of named files (`ABEBLOW.BAN`, `R1P01.CAM`, `S1.PTH`, ...), each
//! of which is a flat list of typed, numbered resource chunks.
//!
//! # Layout
//!
//! - 32-byte header with the `Indx` magic and the file count
//! - 24-byte file records: 12-byte name, start sector, sector count, file size
//! - Files start on 2048-byte sector boundaries and contain 16-byte chunk
//!   headers (`size`, `ref_count`, `type`, `id`) followed by chunk data,
//!   terminated by an `End!` chunk
//!
//! # Example
//!
//! ```no_run
//! use oddlib_lvl::{LvlArchive, ResourceType};
//!
//! let archive = LvlArchive::open("R1.LVL")?;
//!
//! let file = archive.file_by_name("ABEBLOW.BAN")?;
//! for chunk in file.chunks_of_type(ResourceType::ANIM) {
//!     let data = archive.read_data(chunk)?;
//!     println!("{} {}: {} bytes", chunk.resource_type(), chunk.id(), data.len());
//! }
//! # Ok::<(), oddlib_lvl::Error>(())
//! ```

mod archive;
mod chunk;
mod error;
mod header;

pub use archive::{LvlArchive, LvlFile};
pub use chunk::{LvlChunk, ResourceType};
pub use error::{Error, Result};
pub use header::{ChunkHeader, FileRecord, LvlHeader, SECTOR_SIZE};
