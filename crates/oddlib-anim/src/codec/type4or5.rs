use crate::bits::BitReader;
use crate::{Error, Result};

const LENGTH_BITS: u8 = 4;
const DISTANCE_BITS: u8 = 12;
const MIN_MATCH: usize = 2;

/// Decode the LZ bitstream shared by types 4 and 5.
///
/// Tokens start with a flag bit. A clear flag is followed by an 8-bit
/// literal; a set flag by a 4-bit length (`+2`) and a 12-bit distance (`+1`)
/// back into the output. Decoding stops once the frame is full.
pub fn decompress_type4or5(input: &[u8], actual_width: u32, height: u32) -> Result<Vec<u8>> {
    let size = actual_width as usize * height as usize;
    let mut reader = BitReader::new(input);
    let mut out = Vec::with_capacity(size);

    while out.len() < size {
        if !reader.read_bit()? {
            out.push(reader.read_bits(8)? as u8);
            continue;
        }

        let length = reader.read_bits(LENGTH_BITS)? as usize + MIN_MATCH;
        let distance = reader.read_bits(DISTANCE_BITS)? as usize + 1;
        if distance > out.len() {
            return Err(Error::CorruptFrame(format!(
                "back-reference distance {distance} with only {} bytes decoded",
                out.len()
            )));
        }

        // Byte by byte so a match may overlap its own output
        let length = length.min(size - out.len());
        for _ in 0..length {
            out.push(out[out.len() - distance]);
        }
    }

    Ok(out)
}
