//! Seekable little-endian reader over an in-memory container
//!
//! Every read checks the remaining length first, so a short stream surfaces
//! as [`Error::Truncated`] with the failing offset instead of a bare EOF.

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Error, Result};

/// Byte cursor with absolute seeks and fixed-width decoding primitives.
#[derive(Debug, Clone)]
pub struct BinaryCursor<'a> {
    inner: Cursor<&'a [u8]>,
}

impl<'a> BinaryCursor<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            inner: Cursor::new(data),
        }
    }

    /// Total length of the underlying buffer
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current absolute read position
    #[must_use]
    pub fn position(&self) -> usize {
        self.inner.position() as usize
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.position())
    }

    /// Move to an absolute offset. Seeking exactly to the end is allowed.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.len() {
            return Err(Error::OutOfRange {
                offset,
                len: self.len(),
            });
        }
        self.inner.set_position(offset as u64);
        Ok(())
    }

    /// Run `f` at `offset`, then return to the current position.
    ///
    /// The position is restored on error too, so a failed out-of-line parse
    /// never leaves the caller's cursor somewhere else.
    pub fn with_seek<T>(
        &mut self,
        offset: usize,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let saved = self.position();
        self.seek(offset)?;
        let result = f(self);
        self.inner.set_position(saved as u64);
        result
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let available = self.remaining();
        if needed > available {
            return Err(Error::Truncated {
                offset: self.position(),
                needed,
                available,
            });
        }
        Ok(())
    }

    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.ensure(len)?;
        self.inner.set_position((self.position() + len) as u64);
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.inner.read_u8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.inner.read_u16::<LittleEndian>()?)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        Ok(self.inner.read_i16::<LittleEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.inner.read_u32::<LittleEndian>()?)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N)?;
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Borrow the next `len` bytes without copying
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let start = self.position();
        let data: &'a [u8] = *self.inner.get_ref();
        self.inner.set_position((start + len) as u64);
        Ok(&data[start..start + len])
    }

    /// Fixed-width UTF-8 field with every NUL removed. Text after an
    /// interior NUL is kept.
    pub fn read_fixed_string(&mut self, len: usize) -> Result<String> {
        let offset = self.position();
        let bytes = self.read_bytes(len)?;
        let text = std::str::from_utf8(bytes).map_err(|_| Error::InvalidString { offset })?;
        Ok(text.replace('\0', ""))
    }

    /// Exactly `len` bytes of NUL-terminated strings, in order.
    ///
    /// A single terminator at the very end of the block closes the last name
    /// and does not produce an extra empty entry.
    pub fn read_cstring_block(&mut self, len: usize) -> Result<Vec<String>> {
        let offset = self.position();
        let bytes = self.read_bytes(len)?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        let text = std::str::from_utf8(bytes).map_err(|_| Error::InvalidString { offset })?;
        let text = text.strip_suffix('\0').unwrap_or(text);
        Ok(text.split('\0').map(str::to_owned).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_reads() {
        let data = [0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0xFE, 0xFF];
        let mut cursor = BinaryCursor::new(&data);
        assert_eq!(cursor.read_u8().unwrap(), 1);
        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        assert_eq!(cursor.read_u32().unwrap(), 0x12345678);
        assert_eq!(cursor.read_i16().unwrap(), -2);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_short_read_is_truncated() {
        let data = [0x01, 0x02, 0x03];
        let mut cursor = BinaryCursor::new(&data);
        cursor.read_u8().unwrap();
        match cursor.read_u32() {
            Err(Error::Truncated {
                offset,
                needed,
                available,
            }) => {
                assert_eq!(offset, 1);
                assert_eq!(needed, 4);
                assert_eq!(available, 2);
            }
            other => panic!("expected Truncated, got {other:?}"),
        }
        // A failed read does not consume anything
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_seek_bounds() {
        let data = [0u8; 8];
        let mut cursor = BinaryCursor::new(&data);
        cursor.seek(8).unwrap();
        assert_eq!(cursor.remaining(), 0);
        assert!(matches!(
            cursor.seek(9),
            Err(Error::OutOfRange { offset: 9, len: 8 })
        ));
    }

    #[test]
    fn test_with_seek_restores_position() {
        let data = [1, 2, 3, 4, 5, 6];
        let mut cursor = BinaryCursor::new(&data);
        cursor.read_u16().unwrap();

        let value = cursor.with_seek(4, BinaryCursor::read_u8).unwrap();
        assert_eq!(value, 5);
        assert_eq!(cursor.position(), 2);

        let failed = cursor.with_seek(5, BinaryCursor::read_u32);
        assert!(failed.unwrap_err().is_truncation());
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_fixed_string_strips_padding() {
        let mut data = b"Music".to_vec();
        data.resize(16, 0);
        let mut cursor = BinaryCursor::new(&data);
        assert_eq!(cursor.read_fixed_string(16).unwrap(), "Music");
        assert_eq!(cursor.position(), 16);
    }

    #[test]
    fn test_fixed_string_keeps_text_after_interior_nul() {
        let mut data = b"Amb\0ient".to_vec();
        data.resize(12, 0);
        let mut cursor = BinaryCursor::new(&data);
        assert_eq!(cursor.read_fixed_string(12).unwrap(), "Ambient");
    }

    #[test]
    fn test_fixed_string_rejects_bad_utf8() {
        let data = [0xFF, 0xFE, 0, 0];
        let mut cursor = BinaryCursor::new(&data);
        assert!(matches!(
            cursor.read_fixed_string(4),
            Err(Error::InvalidString { offset: 0 })
        ));
    }

    #[test]
    fn test_cstring_block() {
        let data = b"intro\0explosion\0\0footstep\0";
        let mut cursor = BinaryCursor::new(data);
        let names = cursor.read_cstring_block(data.len()).unwrap();
        assert_eq!(names, vec!["intro", "explosion", "", "footstep"]);
    }

    #[test]
    fn test_cstring_block_without_final_terminator() {
        let data = b"a\0b";
        let mut cursor = BinaryCursor::new(data);
        assert_eq!(cursor.read_cstring_block(3).unwrap(), vec!["a", "b"]);
        assert_eq!(BinaryCursor::new(b"").read_cstring_block(0).unwrap().len(), 0);
    }
}
