//! LVL archive reader.
//!
//! The directory and every file's chunk list are parsed up front; chunk data
//! stays in the archive buffer until [`LvlArchive::read_data`] copies it out.

use std::fs::File;
use std::path::Path;

use log::debug;
use memmap2::Mmap;
use oddlib_common::ByteCursor;

use crate::chunk::{LvlChunk, ResourceType};
use crate::header::{ChunkHeader, FileRecord, LvlHeader};
use crate::{Error, Result};

/// Backing storage for the archive bytes.
enum Storage {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Storage {
    #[inline]
    fn bytes(&self) -> &[u8] {
        match self {
            Storage::Mapped(mmap) => mmap,
            Storage::Owned(data) => data,
        }
    }
}

/// An opened LVL archive.
///
/// The archive exclusively owns the file buffer. Chunks handed out by its
/// files are views into that buffer and are only meaningful together with the
/// archive that produced them.
pub struct LvlArchive {
    storage: Storage,
    name: String,
    files: Vec<LvlFile>,
}

/// One named file inside an archive.
#[derive(Debug, Clone)]
pub struct LvlFile {
    name: String,
    offset: usize,
    size: usize,
    chunks: Vec<LvlChunk>,
}

impl LvlArchive {
    /// Open an archive from disk using a memory map.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        // SAFETY: the map is read-only and owned by the archive for its lifetime.
        let mmap = unsafe { Mmap::map(&file)? };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Self::from_storage(Storage::Mapped(mmap), name)
    }

    /// Parse an archive already resident in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_storage(Storage::Owned(data), "memory".to_string())
    }

    fn from_storage(storage: Storage, name: String) -> Result<Self> {
        let files = parse_directory(storage.bytes())?;
        debug!("opened LVL '{}' with {} files", name, files.len());
        Ok(Self {
            storage,
            name,
            files,
        })
    }

    /// Get the archive name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total size of the archive in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.storage.bytes().len()
    }

    /// Number of files in the directory.
    #[inline]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// All files in directory order.
    #[inline]
    pub fn files(&self) -> &[LvlFile] {
        &self.files
    }

    /// Get a file by directory index.
    #[inline]
    pub fn file_by_index(&self, index: usize) -> Option<&LvlFile> {
        self.files.get(index)
    }

    /// Find a file by name (case-insensitive).
    pub fn file_by_name(&self, name: &str) -> Result<&LvlFile> {
        self.files
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::NotFound(format!("file '{}' in '{}'", name, self.name)))
    }

    /// Copy a chunk's data out of the archive.
    ///
    /// Returns exactly `chunk.len()` bytes. Calling it repeatedly always
    /// returns identical data.
    pub fn read_data(&self, chunk: &LvlChunk) -> Result<Vec<u8>> {
        let data = self.storage.bytes();
        let mut cursor = ByteCursor::new_at(data, chunk.offset())?;
        Ok(cursor.read_bytes(chunk.len())?.to_vec())
    }

    /// Look up a chunk by file name and id and copy its data out.
    pub fn read_chunk(&self, file_name: &str, id: u32) -> Result<Vec<u8>> {
        let chunk = self.file_by_name(file_name)?.chunk_by_id(id)?;
        self.read_data(chunk)
    }

    /// Copy several chunks out in parallel.
    #[cfg(feature = "parallel")]
    pub fn read_parallel(&self, chunks: &[LvlChunk]) -> Vec<Result<Vec<u8>>> {
        use rayon::prelude::*;

        chunks.par_iter().map(|chunk| self.read_data(chunk)).collect()
    }
}

impl std::fmt::Debug for LvlArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LvlArchive")
            .field("name", &self.name)
            .field("files", &self.files.len())
            .finish()
    }
}

impl LvlFile {
    /// File name as stored in the directory.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute offset of the file within the archive.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Size of the file in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// All chunks in file order.
    #[inline]
    pub fn chunks(&self) -> &[LvlChunk] {
        &self.chunks
    }

    /// Number of chunks in the file.
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Get a chunk by position.
    #[inline]
    pub fn chunk_by_index(&self, index: usize) -> Option<&LvlChunk> {
        self.chunks.get(index)
    }

    /// Find the first chunk with the given id.
    pub fn chunk_by_id(&self, id: u32) -> Result<&LvlChunk> {
        self.chunks
            .iter()
            .find(|c| c.id() == id)
            .ok_or_else(|| Error::NotFound(format!("chunk id {} in '{}'", id, self.name)))
    }

    /// Find a chunk by type and id.
    pub fn chunk_by_type_and_id(&self, resource_type: ResourceType, id: u32) -> Result<&LvlChunk> {
        self.chunks
            .iter()
            .find(|c| c.resource_type() == resource_type && c.id() == id)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "chunk {} id {} in '{}'",
                    resource_type, id, self.name
                ))
            })
    }

    /// Iterate over the chunks of one type.
    pub fn chunks_of_type(&self, resource_type: ResourceType) -> impl Iterator<Item = &LvlChunk> {
        self.chunks
            .iter()
            .filter(move |c| c.resource_type() == resource_type)
    }

    fn parse(data: &[u8], record: &FileRecord) -> Result<Self> {
        let name = record.name();
        let offset = record.offset();
        let size = record.file_size.get() as usize;

        let end = offset
            .checked_add(size)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| Error::FileOutOfBounds {
                name: name.clone(),
                offset,
                end: offset.saturating_add(size),
                len: data.len(),
            })?;

        let chunks = parse_chunks(&name, &data[offset..end], offset)?;

        Ok(Self {
            name,
            offset,
            size,
            chunks,
        })
    }
}

fn parse_directory(data: &[u8]) -> Result<Vec<LvlFile>> {
    let mut cursor = ByteCursor::new(data);
    let header: LvlHeader = cursor.read_struct()?;

    if header.magic.get() != LvlHeader::MAGIC {
        return Err(Error::InvalidMagic(header.magic.get()));
    }

    let count = header.file_count.get() as usize;

    // Every record must fit in the buffer before we trust the count for allocation
    let records_len = count.saturating_mul(std::mem::size_of::<FileRecord>());
    cursor.peek_bytes(records_len)?;

    let mut files = Vec::with_capacity(count);
    for _ in 0..count {
        let record: FileRecord = cursor.read_struct()?;
        files.push(LvlFile::parse(data, &record)?);
    }

    Ok(files)
}

/// Walk the chunk headers of one file.
fn parse_chunks(name: &str, file_data: &[u8], file_offset: usize) -> Result<Vec<LvlChunk>> {
    let mut cursor = ByteCursor::new(file_data);
    let mut chunks = Vec::new();

    while cursor.remaining() >= ChunkHeader::SIZE {
        let chunk_start = cursor.position();
        let header: ChunkHeader = cursor.read_struct()?;
        let resource_type = ResourceType::from_u32(header.resource_type.get());

        if resource_type == ResourceType::END {
            break;
        }

        let size = header.size.get() as usize;
        if size < ChunkHeader::SIZE {
            return Err(Error::CorruptChunk {
                file: name.to_string(),
                offset: chunk_start,
                reason: format!("size {size} is smaller than the chunk header"),
            });
        }
        if chunk_start + size > file_data.len() {
            return Err(Error::CorruptChunk {
                file: name.to_string(),
                offset: chunk_start,
                reason: format!(
                    "size {size} runs past the end of the file ({} bytes)",
                    file_data.len()
                ),
            });
        }

        if resource_type != ResourceType::PAD {
            chunks.push(LvlChunk::new(
                resource_type,
                header.id.get(),
                header.ref_count.get(),
                file_offset + chunk_start + ChunkHeader::SIZE,
                size - ChunkHeader::SIZE,
            ));
        }

        cursor.seek(chunk_start + size)?;
    }

    Ok(chunks)
}
