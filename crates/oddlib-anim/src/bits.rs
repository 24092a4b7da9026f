//! LSB-first bit reader for the LZ frame codecs.

use oddlib_common::Error as CommonError;

use crate::Result;

/// Reads bits starting from the least significant bit of each byte.
///
/// Multi-bit values are assembled low bit first, so a 4-bit read of the
/// stream `1, 0, 1, 1` yields `0b1101`.
#[derive(Debug)]
pub(crate) struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    pub(crate) const fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Number of bits left in the stream.
    pub(crate) const fn bits_remaining(&self) -> usize {
        self.data
            .len()
            .saturating_mul(8)
            .saturating_sub(self.bit_pos)
    }

    pub(crate) fn read_bit(&mut self) -> Result<bool> {
        self.ensure_bits(1)?;
        let bit = (self.data[self.bit_pos / 8] >> (self.bit_pos % 8)) & 1;
        self.bit_pos += 1;
        Ok(bit == 1)
    }

    /// Read up to 32 bits.
    pub(crate) fn read_bits(&mut self, bits: u8) -> Result<u32> {
        debug_assert!(bits <= 32);
        self.ensure_bits(bits as usize)?;

        let mut value = 0u32;
        for i in 0..bits {
            if self.read_bit()? {
                value |= 1 << i;
            }
        }
        Ok(value)
    }

    fn ensure_bits(&self, bits: usize) -> Result<()> {
        let available = self.bits_remaining();
        if bits > available {
            return Err(CommonError::OutOfData {
                needed: bits.div_ceil(8),
                available: available / 8,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_reads_low_bit_first() {
        let data = [0b1010_1101, 0xFF];
        let mut reader = BitReader::new(&data);

        assert!(reader.read_bit().unwrap());
        assert!(!reader.read_bit().unwrap());
        assert_eq!(reader.read_bits(4).unwrap(), 0b1011);
        assert_eq!(reader.bits_remaining(), 10);

        // Crosses into the second byte.
        assert_eq!(reader.read_bits(4).unwrap(), 0b1110);
    }

    #[test]
    fn test_out_of_bits() {
        let data = [0u8];
        let mut reader = BitReader::new(&data);
        reader.read_bits(6).unwrap();

        let err = reader.read_bits(3).unwrap_err();
        assert!(matches!(err, Error::Common(CommonError::OutOfData { .. })));
        // A failed read consumes nothing.
        assert_eq!(reader.bits_remaining(), 2);
    }
}
