// WDUMP - wdump-error
// Module: Error Types
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! The `Error` type shared by every wdump crate.

use core::fmt;

use crate::{codes, kinds::ErrorKind};

/// `Error` categories for wdump operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorCategory {
    /// Binary decoding errors
    Parse      = 1,
    /// Structural validation errors (printer)
    Validation = 2,
    /// System errors (output sinks)
    System     = 8,
    /// Unknown errors
    Unknown    = 9,
}

/// wdump `Error` type
///
/// Errors are plain values: a category, a code from [`codes`], a static
/// message, and, where the failing stage knows them, the byte offset into the
/// module and the offending value (opcode byte, section code, ...).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Error {
    /// `Error` category
    pub category: ErrorCategory,
    /// `Error` code
    pub code:     u16,
    /// `Error` message
    pub message:  &'static str,
    /// Absolute byte offset in the module, if known
    pub offset:   Option<usize>,
    /// Offending value, if any
    pub value:    Option<u64>,
}

impl Error {
    /// Create a new error.
    #[must_use]
    pub const fn new(category: ErrorCategory, code: u16, message: &'static str) -> Self {
        Self {
            category,
            code,
            message,
            offset: None,
            value: None,
        }
    }

    /// Create an error of the given kind.
    #[must_use]
    pub const fn from_kind(kind: ErrorKind, message: &'static str) -> Self {
        Self::new(kind.category(), kind.code(), message)
    }

    /// Attach the byte offset at which the error occurred.
    #[must_use]
    pub const fn at(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Attach the offending value.
    #[must_use]
    pub const fn with_value(mut self, value: u64) -> Self {
        self.value = Some(value);
        self
    }

    /// The kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::from_code(self.code)
    }

    /// Check whether this error is of the given kind.
    #[must_use]
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }

    // Factory methods

    /// Magic or version mismatch.
    #[must_use]
    pub const fn invalid_header(message: &'static str, offset: usize) -> Self {
        Self::from_kind(ErrorKind::InvalidHeader, message).at(offset)
    }

    /// Unknown section code.
    #[must_use]
    pub const fn invalid_section(code: u64, offset: usize) -> Self {
        Self::from_kind(ErrorKind::InvalidSection, "Unknown section code")
            .at(offset)
            .with_value(code)
    }

    /// Opcode byte outside the table.
    #[must_use]
    pub const fn unknown_opcode(byte: u8, offset: usize) -> Self {
        Self::from_kind(ErrorKind::UnknownOpcode, "Unknown opcode")
            .at(offset)
            .with_value(byte as u64)
    }

    /// Truncated or malformed integer starting at `offset`.
    #[must_use]
    pub const fn bad_number(message: &'static str, offset: usize) -> Self {
        Self::from_kind(ErrorKind::BadNumber, message).at(offset)
    }

    /// Initialization expression used a forbidden opcode.
    #[must_use]
    pub const fn unexpected_expression_opcode(byte: u8, offset: usize) -> Self {
        Self::from_kind(
            ErrorKind::UnexpectedExpressionOpcode,
            "Unexpected opcode in initialization expression",
        )
        .at(offset)
        .with_value(byte as u64)
    }

    /// Block signature byte outside the permitted set.
    #[must_use]
    pub const fn invalid_block_signature(byte: u8, offset: usize) -> Self {
        Self::from_kind(ErrorKind::InvalidBlockSignature, "Invalid block signature")
            .at(offset)
            .with_value(byte as u64)
    }

    /// Instruction stream ended at `actual` instead of `expected`.
    #[must_use]
    pub const fn unaligned_stream_end(expected: usize, actual: usize) -> Self {
        Self::from_kind(
            ErrorKind::UnalignedStreamEnd,
            "Instruction stream did not end at the expected offset",
        )
        .at(actual)
        .with_value(expected as u64)
    }

    /// Not enough bytes left for a byte string or a section.
    #[must_use]
    pub const fn unexpected_end(message: &'static str, offset: usize) -> Self {
        Self::from_kind(ErrorKind::UnexpectedEnd, message).at(offset)
    }

    /// Entry contents do not match the binary format.
    #[must_use]
    pub const fn malformed(message: &'static str, offset: usize) -> Self {
        Self::from_kind(ErrorKind::MalformedEntry, message).at(offset)
    }

    /// Section entries ended at `actual` while the declared end is `expected`.
    #[must_use]
    pub const fn section_length_mismatch(expected: usize, actual: usize) -> Self {
        Self::from_kind(
            ErrorKind::SectionLengthMismatch,
            "Section entries do not match the declared section length",
        )
        .at(actual)
        .with_value(expected as u64)
    }

    /// Unbalanced `end`/`else` in an instruction stream.
    #[must_use]
    pub const fn unbalanced_nesting(message: &'static str) -> Self {
        Self::from_kind(ErrorKind::UnbalancedNesting, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}][E{:04}] {}", self.category, self.code, self.message)?;
        if let Some(value) = self.value {
            write!(f, " (0x{value:x})")?;
        }
        if let Some(offset) = self.offset {
            write!(f, " at offset 0x{offset:x}")?;
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Self::new(
            ErrorCategory::System,
            codes::FORMAT_ERROR,
            "Formatting error",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_opcode_carries_byte_and_offset() {
        let error = Error::unknown_opcode(0xff, 0x2a);
        assert_eq!(error.kind(), ErrorKind::UnknownOpcode);
        assert_eq!(error.value, Some(0xff));
        assert_eq!(error.offset, Some(0x2a));
        assert_eq!(error.category, ErrorCategory::Parse);
    }

    #[test]
    fn test_display_includes_context() {
        let error = Error::invalid_section(13, 8);
        assert_eq!(
            error.to_string(),
            "[Parse][E1001] Unknown section code (0xd) at offset 0x8"
        );
    }

    #[test]
    fn test_display_without_context() {
        let error = Error::unbalanced_nesting("else without if");
        assert_eq!(error.to_string(), "[Validation][E1201] else without if");
    }

    #[test]
    fn test_fmt_error_conversion() {
        let error: Error = core::fmt::Error.into();
        assert!(error.is(ErrorKind::Format));
    }
}
