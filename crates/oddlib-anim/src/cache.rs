//! Content-addressed cache of parsed animation sets.
//!
//! Many LVL files carry byte-identical copies of the same animation chunk.
//! The cache parses each distinct chunk once and hands out shared handles.

use std::sync::Arc;

use log::trace;
use oddlib_common::crc::hash_bytes;
use rustc_hash::FxHashMap;

use crate::{AnimationSet, Result};

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Distinct sets parsed.
    pub unique: usize,
    /// Lookups served from the cache.
    pub hits: usize,
}

/// Caller-owned cache keyed by chunk content.
///
/// Keys are the CRC32C of the chunk bytes; a hash match is confirmed by
/// comparing the bytes before a cached set is returned.
#[derive(Debug, Default)]
pub struct AnimationCache {
    entries: FxHashMap<u32, Vec<Arc<AnimationSet>>>,
    stats: CacheStats,
}

impl AnimationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the set parsed from identical bytes, parsing `data` on a miss.
    pub fn get_or_parse(&mut self, data: &[u8]) -> Result<Arc<AnimationSet>> {
        let key = hash_bytes(data);

        let cached = self
            .entries
            .get(&key)
            .and_then(|bucket| bucket.iter().find(|s| s.data() == data));
        if let Some(set) = cached {
            let set = Arc::clone(set);
            self.stats.hits += 1;
            trace!("animation cache hit for {key:#010x}");
            return Ok(set);
        }

        // Only successful parses get a bucket
        let set = Arc::new(AnimationSet::parse(data)?);
        self.entries.entry(key).or_default().push(Arc::clone(&set));
        self.stats.unique += 1;
        Ok(set)
    }

    /// Whether identical bytes have already been parsed.
    pub fn contains(&self, data: &[u8]) -> bool {
        self.entries
            .get(&hash_bytes(data))
            .is_some_and(|bucket| bucket.iter().any(|s| s.data() == data))
    }

    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of distinct sets held.
    #[inline]
    pub fn len(&self) -> usize {
        self.stats.unique
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stats.unique == 0
    }

    /// Drop every cached set and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{LittleEndian, WriteBytesExt};

    /// A small valid set: an empty group at the table, resumed 0x14 from
    /// the end onto a one-frame group that leads back to the table.
    fn set_bytes(fps: u16) -> Vec<u8> {
        let mut out = Vec::new();
        out.write_u16::<LittleEndian>(1).unwrap();
        out.write_u16::<LittleEndian>(1).unwrap();
        out.write_u32::<LittleEndian>(48).unwrap();
        out.write_u32::<LittleEndian>(2).unwrap();
        out.write_u16::<LittleEndian>(0x001F).unwrap();
        out.write_u16::<LittleEndian>(0x03E0).unwrap();
        // 16: frame info
        out.write_u32::<LittleEndian>(0).unwrap();
        out.write_u32::<LittleEndian>(3).unwrap();
        out.resize(36, 0);
        // 36: one-frame group
        for v in [fps, 1, 0, 0] {
            out.write_u16::<LittleEndian>(v).unwrap();
        }
        out.write_u32::<LittleEndian>(16).unwrap();
        // 48: empty group at the table
        for v in [fps, 0, 0, 0] {
            out.write_u16::<LittleEndian>(v).unwrap();
        }
        out
    }

    #[test]
    fn test_identical_bytes_share_a_set() {
        let mut cache = AnimationCache::new();
        let a = cache.get_or_parse(&set_bytes(5)).unwrap();
        let b = cache.get_or_parse(&set_bytes(5)).unwrap();
        let c = cache.get_or_parse(&set_bytes(6)).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.stats(), CacheStats { unique: 2, hits: 1 });
        assert!(cache.contains(&set_bytes(6)));
        assert!(!cache.contains(&set_bytes(7)));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_parse_failure_is_not_cached() {
        let mut cache = AnimationCache::new();
        assert!(cache.get_or_parse(&[0u8; 4]).is_err());
        assert!(cache.get_or_parse(&[1u8; 6]).is_err());
        assert_eq!(cache.len(), 0);
        assert!(cache.entries.is_empty());
        assert!(!cache.contains(&[0u8; 4]));

        cache.get_or_parse(&set_bytes(5)).unwrap();
        assert_eq!(cache.entries.len(), 1);
    }
}
