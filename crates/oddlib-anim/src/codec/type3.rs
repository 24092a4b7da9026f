use oddlib_common::ByteCursor;

use crate::{Error, Result};

/// Decode per-row skip/copy runs.
///
/// Each row is a list of `(skip, copy)` byte pairs: `skip` transparent
/// pixels followed by `copy` literal indices. A `(0, 0)` pair or reaching
/// `width` ends the row, and the row is padded to `actual_width`.
pub fn decompress_type3(
    input: &[u8],
    actual_width: u32,
    width: u32,
    height: u32,
) -> Result<Vec<u8>> {
    let stride = actual_width as usize;
    let width = width as usize;
    let mut cursor = ByteCursor::new(input);
    let mut out = Vec::with_capacity(stride * height as usize);

    for y in 0..height {
        let row_start = out.len();

        while out.len() - row_start < width {
            let skip = cursor.read_u8()? as usize;
            let copy = cursor.read_u8()? as usize;
            if skip == 0 && copy == 0 {
                break;
            }

            let x = out.len() - row_start;
            if x + skip + copy > stride {
                return Err(Error::CorruptFrame(format!(
                    "row {y} run of {} pixels at x={x} overflows width {stride}",
                    skip + copy
                )));
            }

            out.resize(out.len() + skip, 0);
            out.extend_from_slice(cursor.read_bytes(copy)?);
        }

        out.resize(row_start + stride, 0);
    }

    Ok(out)
}
