// WDUMP - wdump-format
// Module: Binary Encoding Primitives
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! WebAssembly binary format primitives.
//!
//! Readers follow the `(bytes, pos) -> Result<(value, consumed)>` convention:
//! `pos` is an index into `bytes` and the returned count is the number of
//! bytes the encoding occupied. Error offsets are indices into `bytes`, so
//! callers that slice the module must pass the whole module.
//!
//! LEB128 decoding is strict. An N-bit value may use at most `ceil(N / 7)`
//! bytes, and the unused high bits of the final byte must be zero (unsigned)
//! or a copy of the sign bit (signed). A malformed number is reported at the
//! offset where it starts; a truncated one at the offset where input ran out.

use alloc::vec::Vec;

use wdump_error::{Error, Result};

/// Module magic, `"\0asm"` read as a little-endian u32.
pub const WASM_MAGIC: u32 = 0x6D73_6100;

/// Magic bytes for WebAssembly modules: \0asm
pub const WASM_MAGIC_BYTES: [u8; 4] = [0x00, 0x61, 0x73, 0x6D];

/// The only supported binary format version.
pub const WASM_VERSION: u32 = 1;

/// Size of the module header (magic + version).
pub const HEADER_SIZE: usize = 8;

/// WebAssembly section IDs
pub const CUSTOM_SECTION_ID: u8 = 0x00;
pub const TYPE_SECTION_ID: u8 = 0x01;
pub const IMPORT_SECTION_ID: u8 = 0x02;
pub const FUNCTION_SECTION_ID: u8 = 0x03;
pub const TABLE_SECTION_ID: u8 = 0x04;
pub const MEMORY_SECTION_ID: u8 = 0x05;
pub const GLOBAL_SECTION_ID: u8 = 0x06;
pub const EXPORT_SECTION_ID: u8 = 0x07;
pub const START_SECTION_ID: u8 = 0x08;
pub const ELEMENT_SECTION_ID: u8 = 0x09;
pub const CODE_SECTION_ID: u8 = 0x0A;
pub const DATA_SECTION_ID: u8 = 0x0B;

/// Type codes as stored in the binary
pub const I32_TYPE: u8 = 0x7F;
pub const I64_TYPE: u8 = 0x7E;
pub const F32_TYPE: u8 = 0x7D;
pub const F64_TYPE: u8 = 0x7C;
pub const ANYFUNC_TYPE: u8 = 0x70;
pub const FUNC_TYPE: u8 = 0x60;
pub const EMPTY_BLOCK_TYPE: u8 = 0x40;

const CONTINUATION: u8 = 0x80;
const PAYLOAD: u8 = 0x7F;

/// Maximum encoded length of an `bits`-wide LEB128 value.
const fn max_leb128_len(bits: u32) -> usize {
    bits.div_ceil(7) as usize
}

fn read_unsigned(bytes: &[u8], pos: usize, bits: u32) -> Result<(u64, usize)> {
    let max_len = max_leb128_len(bits);
    let mut result = 0u64;
    let mut shift = 0u32;
    let mut consumed = 0usize;

    loop {
        let Some(&byte) = bytes.get(pos + consumed) else {
            return Err(Error::bad_number("Truncated LEB128 integer", pos + consumed));
        };
        consumed += 1;
        let payload = u64::from(byte & PAYLOAD);

        if consumed == max_len {
            if byte & CONTINUATION != 0 {
                return Err(Error::bad_number("LEB128 integer too long", pos));
            }
            let remaining_bits = bits - shift;
            if remaining_bits < 7 && payload >> remaining_bits != 0 {
                return Err(Error::bad_number("LEB128 integer has unused bits set", pos));
            }
            return Ok((result | (payload << shift), consumed));
        }

        result |= payload << shift;
        if byte & CONTINUATION == 0 {
            return Ok((result, consumed));
        }
        shift += 7;
    }
}

fn read_signed(bytes: &[u8], pos: usize, bits: u32) -> Result<(i64, usize)> {
    let max_len = max_leb128_len(bits);
    let mut result = 0i64;
    let mut shift = 0u32;
    let mut consumed = 0usize;

    let last = loop {
        let Some(&byte) = bytes.get(pos + consumed) else {
            return Err(Error::bad_number("Truncated LEB128 integer", pos + consumed));
        };
        consumed += 1;
        let payload = byte & PAYLOAD;

        if consumed == max_len {
            if byte & CONTINUATION != 0 {
                return Err(Error::bad_number("LEB128 integer too long", pos));
            }
            let remaining_bits = bits - shift;
            if remaining_bits < 7 {
                // Sign bit and everything above it must agree.
                let high = payload >> (remaining_bits - 1);
                if high != 0 && high != PAYLOAD >> (remaining_bits - 1) {
                    return Err(Error::bad_number(
                        "LEB128 integer is not sign-extended",
                        pos,
                    ));
                }
            }
        }

        result |= i64::from(payload) << shift;
        shift += 7;
        if byte & CONTINUATION == 0 {
            break byte;
        }
    };

    if shift < 64 && last & 0x40 != 0 {
        result |= -1i64 << shift;
    }
    Ok((result, consumed))
}

/// Read a `varuint1` (0 or 1).
pub fn read_var_u1(bytes: &[u8], pos: usize) -> Result<(u8, usize)> {
    let (value, len) = read_unsigned(bytes, pos, 1)?;
    Ok((value as u8, len))
}

/// Read a `varuint7`.
pub fn read_var_u7(bytes: &[u8], pos: usize) -> Result<(u8, usize)> {
    let (value, len) = read_unsigned(bytes, pos, 7)?;
    Ok((value as u8, len))
}

/// Read a `varuint32`.
pub fn read_var_u32(bytes: &[u8], pos: usize) -> Result<(u32, usize)> {
    let (value, len) = read_unsigned(bytes, pos, 32)?;
    Ok((value as u32, len))
}

/// Read a `varuint64`.
pub fn read_var_u64(bytes: &[u8], pos: usize) -> Result<(u64, usize)> {
    read_unsigned(bytes, pos, 64)
}

/// Read a `varint7`.
pub fn read_var_i7(bytes: &[u8], pos: usize) -> Result<(i8, usize)> {
    let (value, len) = read_signed(bytes, pos, 7)?;
    Ok((value as i8, len))
}

/// Read a `varint32`.
pub fn read_var_i32(bytes: &[u8], pos: usize) -> Result<(i32, usize)> {
    let (value, len) = read_signed(bytes, pos, 32)?;
    Ok((value as i32, len))
}

/// Read a `varint64`.
pub fn read_var_i64(bytes: &[u8], pos: usize) -> Result<(i64, usize)> {
    read_signed(bytes, pos, 64)
}

/// Read a little-endian u32.
pub fn read_u32_le(bytes: &[u8], pos: usize) -> Result<(u32, usize)> {
    let raw = bytes
        .get(pos..pos + 4)
        .and_then(|slice| <[u8; 4]>::try_from(slice).ok())
        .ok_or_else(|| Error::bad_number("Truncated 32-bit integer", bytes.len().max(pos)))?;
    Ok((u32::from_le_bytes(raw), 4))
}

/// Read a little-endian u64.
pub fn read_u64_le(bytes: &[u8], pos: usize) -> Result<(u64, usize)> {
    let raw = bytes
        .get(pos..pos + 8)
        .and_then(|slice| <[u8; 8]>::try_from(slice).ok())
        .ok_or_else(|| Error::bad_number("Truncated 64-bit integer", bytes.len().max(pos)))?;
    Ok((u64::from_le_bytes(raw), 8))
}

/// Write an unsigned LEB128 value
pub fn write_var_u64(mut value: u64) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let byte = (value & u64::from(PAYLOAD)) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | CONTINUATION);
    }
}

/// Write a `varuint32`
pub fn write_var_u32(value: u32) -> Vec<u8> {
    write_var_u64(u64::from(value))
}

/// Write a signed LEB128 value
pub fn write_var_i64(mut value: i64) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let byte = (value & i64::from(PAYLOAD)) as u8;
        value >>= 7;
        let done = (value == 0 && byte & 0x40 == 0) || (value == -1 && byte & 0x40 != 0);
        if done {
            out.push(byte);
            return out;
        }
        out.push(byte | CONTINUATION);
    }
}

/// Write a `varint32`
pub fn write_var_i32(value: i32) -> Vec<u8> {
    write_var_i64(i64::from(value))
}

/// Write a length-prefixed UTF-8 string
pub fn write_string(value: &str) -> Vec<u8> {
    let mut out = write_var_u32(value.len() as u32);
    out.extend_from_slice(value.as_bytes());
    out
}

/// Write a section header: id byte followed by the payload length
pub fn write_section_header(id: u8, payload_len: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(6);
    out.push(id);
    out.extend_from_slice(&write_var_u32(payload_len));
    out
}

/// Write the module header (magic + version 1)
pub fn write_header() -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE);
    out.extend_from_slice(&WASM_MAGIC_BYTES);
    out.extend_from_slice(&WASM_VERSION.to_le_bytes());
    out
}

#[cfg(test)]
mod tests {
    use wdump_error::ErrorKind;

    use super::*;

    #[test]
    fn test_read_var_u32_multi_byte() {
        assert_eq!(read_var_u32(&[0xE5, 0x8E, 0x26], 0).unwrap(), (624_485, 3));
        assert_eq!(
            read_var_u32(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F], 0).unwrap(),
            (u32::MAX, 5)
        );
    }

    #[test]
    fn test_read_var_u32_rejects_overlong() {
        let err = read_var_u32(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x00], 0).unwrap_err();
        assert!(err.is(ErrorKind::BadNumber));
    }

    #[test]
    fn test_read_var_u32_rejects_unused_bits() {
        // 0x1F in the fifth byte would need 33 bits
        let err = read_var_u32(&[0xFF, 0xFF, 0xFF, 0xFF, 0x1F], 0).unwrap_err();
        assert!(err.is(ErrorKind::BadNumber));
    }

    #[test]
    fn test_read_var_u1() {
        assert_eq!(read_var_u1(&[0x01], 0).unwrap(), (1, 1));
        assert!(read_var_u1(&[0x02], 0).is_err());
        assert!(read_var_u1(&[0x80, 0x00], 0).is_err());
    }

    #[test]
    fn test_truncated_reports_end_of_input() {
        let err = read_var_u32(&[0x00, 0x00, 0x80, 0x80], 2).unwrap_err();
        assert!(err.is(ErrorKind::BadNumber));
        assert_eq!(err.offset, Some(4));
    }

    #[test]
    fn test_malformed_reports_start_offset() {
        let err = read_var_u32(&[0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F], 1).unwrap_err();
        assert_eq!(err.offset, Some(1));
    }

    #[test]
    fn test_read_var_i32() {
        assert_eq!(read_var_i32(&[0x7B], 0).unwrap(), (-5, 1));
        assert_eq!(read_var_i32(&[0x3F], 0).unwrap(), (63, 1));
        assert_eq!(read_var_i32(&[0xC0, 0x00], 0).unwrap(), (64, 2));
        assert_eq!(
            read_var_i32(&[0x80, 0x80, 0x80, 0x80, 0x78], 0).unwrap(),
            (i32::MIN, 5)
        );
        assert_eq!(
            read_var_i32(&[0xFF, 0xFF, 0xFF, 0xFF, 0x07], 0).unwrap(),
            (i32::MAX, 5)
        );
    }

    #[test]
    fn test_read_var_i32_rejects_bad_sign_extension() {
        // Bits above bit 31 disagree with the sign bit
        let err = read_var_i32(&[0xFF, 0xFF, 0xFF, 0xFF, 0x4F], 0).unwrap_err();
        assert!(err.is(ErrorKind::BadNumber));
    }

    #[test]
    fn test_read_var_i64_extremes() {
        let min = write_var_i64(i64::MIN);
        assert_eq!(min.len(), 10);
        assert_eq!(read_var_i64(&min, 0).unwrap(), (i64::MIN, 10));
        let max = write_var_i64(i64::MAX);
        assert_eq!(read_var_i64(&max, 0).unwrap(), (i64::MAX, 10));
    }

    #[test]
    fn test_read_var_i7() {
        assert_eq!(read_var_i7(&[0x40], 0).unwrap(), (-64, 1));
        assert_eq!(read_var_i7(&[0x7F], 0).unwrap(), (-1, 1));
        assert!(read_var_i7(&[0x80, 0x00], 0).is_err());
    }

    #[test]
    fn test_fixed_width() {
        assert_eq!(
            read_u32_le(&[0x00, 0x61, 0x73, 0x6D], 0).unwrap(),
            (WASM_MAGIC, 4)
        );
        assert!(read_u32_le(&[0x00, 0x61, 0x73], 0).is_err());
        assert!(read_u64_le(&[0; 7], 0).is_err());
    }

    #[test]
    fn test_writers() {
        assert_eq!(write_var_u32(624_485), vec![0xE5, 0x8E, 0x26]);
        assert_eq!(write_var_i32(-5), vec![0x7B]);
        assert_eq!(write_var_i32(64), vec![0xC0, 0x00]);
        assert_eq!(write_string("env"), vec![0x03, b'e', b'n', b'v']);
        assert_eq!(write_section_header(TYPE_SECTION_ID, 7), vec![0x01, 0x07]);
        assert_eq!(write_header(), vec![0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00]);
    }
}
