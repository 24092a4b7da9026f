//! Content hashing for deduplication.
//!
//! Identical resources are stored many times across LVL archives (often under
//! different ids), so decoded data is deduplicated by a CRC32C of the raw
//! chunk bytes before an exact comparison.

/// CRC32C (Castagnoli) of `data`; hardware-accelerated where supported.
#[inline]
pub fn hash_bytes(data: &[u8]) -> u32 {
    crc32c::crc32c(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(hash_bytes(&[]), 0);
    }

    #[test]
    fn test_check_value() {
        // Standard CRC-32C check value.
        assert_eq!(hash_bytes(b"123456789"), 0xE306_9283);
    }

    #[test]
    fn test_chunk_tags_differ() {
        assert_ne!(hash_bytes(b"Anim"), hash_bytes(b"Path"));
    }
}
