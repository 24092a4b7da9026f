//! Byte cursor for bounds-checked parsing of byte slices.
//!
//! The legacy formats jump around a lot (frame tables point backwards into
//! frame data, group discovery seeks relative to earlier records), so the
//! cursor allows seeking anywhere inside the buffer but never reads past it.

use zerocopy::FromBytes;

use crate::{Error, Result};

/// A sequential reader over an immutable byte slice.
///
/// Every read advances the position by exactly the width read, and fails with
/// [`Error::OutOfData`] instead of truncating. Integers are always decoded as
/// little-endian, whatever the host byte order.
///
/// # Example
///
/// ```
/// use oddlib_common::ByteCursor;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0xFF, 0xFF];
/// let mut cursor = ByteCursor::new(&data);
///
/// assert_eq!(cursor.read_u32().unwrap(), 0x04030201);
/// assert_eq!(cursor.read_i16().unwrap(), -1);
/// assert!(cursor.at_end());
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

macro_rules! read_le {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("Read a little-endian `", stringify!($ty), "`.")]
            #[inline]
            pub fn $name(&mut self) -> Result<$ty> {
                self.take::<{ std::mem::size_of::<$ty>() }>().map(<$ty>::from_le_bytes)
            }
        )*
    };
}

impl<'a> ByteCursor<'a> {
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Cursor already seeked to `position`.
    #[inline]
    pub fn new_at(data: &'a [u8], position: usize) -> Result<Self> {
        let mut cursor = Self::new(data);
        cursor.seek(position)?;
        Ok(cursor)
    }

    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Length of the whole buffer, not of what is left.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    #[inline]
    pub const fn at_end(&self) -> bool {
        self.position == self.data.len()
    }

    /// Move to an absolute position, backwards or forwards.
    ///
    /// `position == len()` is valid and leaves the cursor at the end.
    #[inline]
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(Error::InvalidSeek {
                position,
                len: self.data.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// The next `count` bytes, leaving the position where it is.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if count > available {
            return Err(Error::OutOfData {
                needed: count,
                available,
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Borrow the next `count` bytes and step past them.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    #[inline]
    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    read_le! {
        read_u8 => u8,
        read_i8 => i8,
        read_u16 => u16,
        read_i16 => i16,
        read_u32 => u32,
        read_i32 => i32,
    }

    /// Decode a `#[repr(C)]` record.
    ///
    /// Field types from [`crate::le`] keep the result independent of host
    /// endianness.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::OutOfData {
            needed: size,
            available: bytes.len(),
        })
    }

    /// Consume `expected.len()` bytes and check they equal `expected`.
    pub fn expect_magic(&mut self, expected: &[u8]) -> Result<()> {
        let actual = self.read_bytes(expected.len())?;
        if actual == expected {
            return Ok(());
        }
        Err(Error::InvalidMagic {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        })
    }
}
