//! Property tests for the LEB128 codec and the byte cursor

use proptest::prelude::*;
use wdump_error::ErrorKind;
use wdump_format::{binary, BinaryReader};

proptest! {
    #[test]
    fn var_u32_round_trips(value in any::<u32>()) {
        let bytes = binary::write_var_u32(value);
        prop_assert!(bytes.len() <= 5);
        prop_assert_eq!(binary::read_var_u32(&bytes, 0).unwrap(), (value, bytes.len()));
    }

    #[test]
    fn var_u64_round_trips(value in any::<u64>()) {
        let bytes = binary::write_var_u64(value);
        prop_assert!(bytes.len() <= 10);
        prop_assert_eq!(binary::read_var_u64(&bytes, 0).unwrap(), (value, bytes.len()));
    }

    #[test]
    fn var_i32_round_trips(value in any::<i32>()) {
        let bytes = binary::write_var_i32(value);
        prop_assert!(bytes.len() <= 5);
        prop_assert_eq!(binary::read_var_i32(&bytes, 0).unwrap(), (value, bytes.len()));
    }

    #[test]
    fn var_i64_round_trips(value in any::<i64>()) {
        let bytes = binary::write_var_i64(value);
        prop_assert!(bytes.len() <= 10);
        prop_assert_eq!(binary::read_var_i64(&bytes, 0).unwrap(), (value, bytes.len()));
    }

    #[test]
    fn padded_var_u32_is_accepted_up_to_five_bytes(value in 0u32..(1 << 7)) {
        // Redundant zero continuation bytes are legal while within the limit
        let bytes = [value as u8 | 0x80, 0x80, 0x80, 0x80, 0x00];
        prop_assert_eq!(binary::read_var_u32(&bytes, 0).unwrap(), (value, 5));
    }

    #[test]
    fn truncated_varint_is_bad_number(value in (1u32 << 7)..) {
        let bytes = binary::write_var_u32(value);
        let truncated = &bytes[..bytes.len() - 1];
        let err = binary::read_var_u32(truncated, 0).unwrap_err();
        prop_assert!(err.is(ErrorKind::BadNumber));
        prop_assert_eq!(err.offset, Some(truncated.len()));
    }

    #[test]
    fn reader_tracks_absolute_positions(prefix in 0usize..16, value in any::<u32>()) {
        let mut bytes = vec![0u8; prefix];
        bytes.extend_from_slice(&binary::write_var_u32(value));
        let mut reader = BinaryReader::new(&bytes);
        reader.skip_to(prefix).unwrap();
        prop_assert_eq!(reader.read_var_u32().unwrap(), value);
        prop_assert!(reader.is_at_end());
        prop_assert_eq!(reader.position(), bytes.len());
    }
}

#[test]
fn test_module_header_fixture() {
    let bytes = hex::decode("0061736d01000000").unwrap();
    let mut reader = BinaryReader::new(&bytes);
    assert_eq!(reader.read_u32_le().unwrap(), binary::WASM_MAGIC);
    assert_eq!(reader.read_u32_le().unwrap(), binary::WASM_VERSION);
    assert_eq!(bytes, binary::write_header());
}
