// WDUMP - wdump-format
// Module: Binary Cursor
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Bounded cursor over a module's bytes.
//!
//! A [`BinaryReader`] always refers to the complete module slice; its
//! position and limit are absolute module offsets, so every error it raises
//! points at the right byte no matter how deeply the reader was narrowed.

use log::trace;
use wdump_error::{Error, Result};

use crate::binary;

/// Cursor over a module byte slice with an exclusive end limit.
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    bytes:    &'a [u8],
    position: usize,
    end:      usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a reader over the whole slice.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            position: 0,
            end: bytes.len(),
        }
    }

    /// Current absolute offset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Exclusive absolute limit of this reader.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Bytes left before the limit.
    pub fn remaining(&self) -> usize {
        self.end.saturating_sub(self.position)
    }

    /// Whether the cursor sits at its limit.
    pub fn is_at_end(&self) -> bool {
        self.position >= self.end
    }

    /// The bytes between the cursor and the limit.
    pub fn remaining_bytes(&self) -> &'a [u8] {
        self.bytes.get(self.position..self.end).unwrap_or_default()
    }

    /// Visible part of the module; reads never look past `end`.
    fn window(&self) -> &'a [u8] {
        self.bytes.get(..self.end).unwrap_or_default()
    }

    /// Split off a reader over the next `len` bytes and advance past them.
    ///
    /// The returned reader keeps absolute offsets. This reader continues at
    /// the end of the split range whatever the caller does with the new one.
    pub fn sub_reader(&mut self, len: usize) -> Result<BinaryReader<'a>> {
        let start = self.position;
        let end = start
            .checked_add(len)
            .filter(|&end| end <= self.end)
            .ok_or_else(|| Error::unexpected_end("Length runs past end of input", start))?;
        self.position = end;
        trace!("sub_reader: 0x{:x}..0x{:x}", start, end);
        Ok(BinaryReader {
            bytes: self.bytes,
            position: start,
            end,
        })
    }

    /// Move the cursor to an absolute offset within the limit.
    pub fn skip_to(&mut self, offset: usize) -> Result<()> {
        if offset < self.position || offset > self.end {
            return Err(Error::unexpected_end("Cannot skip outside the reader", offset));
        }
        if offset > self.position {
            trace!("skip_to: 0x{:x} -> 0x{:x}", self.position, offset);
        }
        self.position = offset;
        Ok(())
    }

    /// Read one raw byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = self
            .window()
            .get(self.position)
            .copied()
            .ok_or_else(|| Error::bad_number("Unexpected end of input", self.position))?;
        self.position += 1;
        Ok(byte)
    }

    fn advance<T>(&mut self, (value, len): (T, usize)) -> T {
        self.position += len;
        value
    }

    /// Read a `varuint1`.
    pub fn read_var_u1(&mut self) -> Result<u8> {
        let read = binary::read_var_u1(self.window(), self.position)?;
        Ok(self.advance(read))
    }

    /// Read a `varuint1` as a flag.
    pub fn read_flag(&mut self) -> Result<bool> {
        Ok(self.read_var_u1()? == 1)
    }

    /// Read a `varuint7`.
    pub fn read_var_u7(&mut self) -> Result<u8> {
        let read = binary::read_var_u7(self.window(), self.position)?;
        Ok(self.advance(read))
    }

    /// Read a `varuint32`.
    pub fn read_var_u32(&mut self) -> Result<u32> {
        let read = binary::read_var_u32(self.window(), self.position)?;
        Ok(self.advance(read))
    }

    /// Read a `varuint64`.
    pub fn read_var_u64(&mut self) -> Result<u64> {
        let read = binary::read_var_u64(self.window(), self.position)?;
        Ok(self.advance(read))
    }

    /// Read a `varint7`.
    pub fn read_var_i7(&mut self) -> Result<i8> {
        let read = binary::read_var_i7(self.window(), self.position)?;
        Ok(self.advance(read))
    }

    /// Read a `varint32`.
    pub fn read_var_i32(&mut self) -> Result<i32> {
        let read = binary::read_var_i32(self.window(), self.position)?;
        Ok(self.advance(read))
    }

    /// Read a `varint64`.
    pub fn read_var_i64(&mut self) -> Result<i64> {
        let read = binary::read_var_i64(self.window(), self.position)?;
        Ok(self.advance(read))
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let read = binary::read_u32_le(self.window(), self.position)?;
        Ok(self.advance(read))
    }

    /// Read a little-endian u64.
    pub fn read_u64_le(&mut self) -> Result<u64> {
        let read = binary::read_u64_le(self.window(), self.position)?;
        Ok(self.advance(read))
    }

    /// Read `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let start = self.position;
        let bytes = start
            .checked_add(len)
            .and_then(|end| self.window().get(start..end))
            .ok_or_else(|| Error::unexpected_end("Byte string runs past end of input", start))?;
        self.position += len;
        Ok(bytes)
    }

    /// Read a `varuint32`-length-prefixed byte string.
    pub fn read_byte_string(&mut self) -> Result<&'a [u8]> {
        let len = self.read_var_u32()?;
        self.read_bytes(len as usize)
    }

    /// Read a `varuint32`-length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<&'a str> {
        let start = self.position;
        let bytes = self.read_byte_string()?;
        core::str::from_utf8(bytes).map_err(|_| Error::malformed("Invalid UTF-8 in name", start))
    }
}

#[cfg(test)]
mod tests {
    use wdump_error::ErrorKind;

    use super::*;

    #[test]
    fn test_sub_reader_keeps_absolute_offsets() {
        let bytes = [0x01, 0x02, 0x03, 0x04, 0x05];
        let mut reader = BinaryReader::new(&bytes);
        reader.read_u8().unwrap();
        let mut sub = reader.sub_reader(2).unwrap();
        assert_eq!(reader.position(), 3);
        assert_eq!(sub.position(), 1);
        assert_eq!(sub.end(), 3);
        assert_eq!(sub.read_u8().unwrap(), 0x02);
        assert_eq!(sub.read_u8().unwrap(), 0x03);
        let err = sub.read_u8().unwrap_err();
        assert!(err.is(ErrorKind::BadNumber));
        assert_eq!(err.offset, Some(3));
    }

    #[test]
    fn test_sub_reader_past_end() {
        let bytes = [0x00; 4];
        let mut reader = BinaryReader::new(&bytes);
        let err = reader.sub_reader(5).unwrap_err();
        assert!(err.is(ErrorKind::UnexpectedEnd));
    }

    #[test]
    fn test_varint_does_not_read_past_limit() {
        // The continuation byte at offset 1 is outside the sub reader
        let bytes = [0x80, 0x01];
        let mut reader = BinaryReader::new(&bytes);
        let mut sub = reader.sub_reader(1).unwrap();
        assert!(sub.read_var_u32().unwrap_err().is(ErrorKind::BadNumber));
    }

    #[test]
    fn test_read_string() {
        let bytes = [0x03, b'e', b'n', b'v', 0x02, 0xFF, 0xFE];
        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(reader.read_string().unwrap(), "env");
        let err = reader.read_string().unwrap_err();
        assert!(err.is(ErrorKind::MalformedEntry));
        assert_eq!(err.offset, Some(4));
    }

    #[test]
    fn test_read_bytes_past_end() {
        let bytes = [0x05, 0x01];
        let mut reader = BinaryReader::new(&bytes);
        let err = reader.read_byte_string().unwrap_err();
        assert!(err.is(ErrorKind::UnexpectedEnd));
        assert_eq!(err.offset, Some(1));
    }

    #[test]
    fn test_skip_to() {
        let bytes = [0x00; 8];
        let mut reader = BinaryReader::new(&bytes);
        reader.skip_to(6).unwrap();
        assert_eq!(reader.remaining(), 2);
        assert!(reader.skip_to(9).is_err());
        assert!(reader.skip_to(2).is_err());
    }
}
