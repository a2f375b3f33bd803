// WDUMP - wdump-error
// Module: Error Codes
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Error codes for wdump
//!
//! Codes are grouped by the stage that raises them:
//!
//! - 1000-1099: binary framing (header, sections, numbers)
//! - 1100-1199: instruction decoding
//! - 1200-1299: canonical printing
//! - 8000-8099: system (output sinks)

// Binary framing (1000-1099)
/// Magic or version mismatch, or truncated header
pub const INVALID_HEADER: u16 = 1000;
/// Section code outside the known set
pub const INVALID_SECTION: u16 = 1001;
/// Input exhausted or malformed while reading an integer
pub const BAD_NUMBER: u16 = 1002;
/// Byte string or section extends past the end of the input
pub const UNEXPECTED_END: u16 = 1003;
/// Entry contents do not match the binary format
pub const MALFORMED_ENTRY: u16 = 1004;
/// A section's entries did not consume exactly its declared length
pub const SECTION_LENGTH_MISMATCH: u16 = 1005;

// Instruction decoding (1100-1199)
/// Instruction byte outside the opcode table
pub const UNKNOWN_OPCODE: u16 = 1100;
/// Initialization expression used an opcode outside the permitted set
pub const UNEXPECTED_EXPRESSION_OPCODE: u16 = 1101;
/// Instruction decoding did not land exactly on the expected end offset
pub const UNALIGNED_STREAM_END: u16 = 1102;

// Canonical printing (1200-1299)
/// Block signature byte outside the value-type-or-empty set
pub const INVALID_BLOCK_SIGNATURE: u16 = 1200;
/// `end` or `else` without a matching construct, or unterminated body
pub const UNBALANCED_NESTING: u16 = 1201;

// System (8000-8099)
/// Output sink reported a formatting failure
pub const FORMAT_ERROR: u16 = 8000;
