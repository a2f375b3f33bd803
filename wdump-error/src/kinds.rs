// WDUMP - wdump-error
// Module: Error Kinds
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Error kind definitions.
//!
//! Every error code maps to exactly one [`ErrorKind`]. Callers that need to
//! branch on the failure match on the kind instead of comparing raw codes.

use core::fmt;

use crate::{codes, ErrorCategory};

/// The failure kinds raised while decoding or printing a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Magic or version mismatch
    InvalidHeader,
    /// Section code outside the known set
    InvalidSection,
    /// Instruction byte outside the opcode table
    UnknownOpcode,
    /// Input exhausted or malformed while reading an integer
    BadNumber,
    /// Initialization expression decoded a forbidden opcode
    UnexpectedExpressionOpcode,
    /// Block-entry signature byte outside the permitted set
    InvalidBlockSignature,
    /// Instruction decoding did not land exactly on the end offset
    UnalignedStreamEnd,
    /// Byte string or section extends past the end of the input
    UnexpectedEnd,
    /// Entry contents do not match the binary format
    MalformedEntry,
    /// Section entries did not consume exactly the declared length
    SectionLengthMismatch,
    /// Unbalanced `end`/`else` found while printing
    UnbalancedNesting,
    /// The text sink failed
    Format,
    /// A code that is not part of this table
    Unknown,
}

impl ErrorKind {
    /// Map a numeric error code to its kind.
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            codes::INVALID_HEADER => Self::InvalidHeader,
            codes::INVALID_SECTION => Self::InvalidSection,
            codes::BAD_NUMBER => Self::BadNumber,
            codes::UNEXPECTED_END => Self::UnexpectedEnd,
            codes::MALFORMED_ENTRY => Self::MalformedEntry,
            codes::SECTION_LENGTH_MISMATCH => Self::SectionLengthMismatch,
            codes::UNKNOWN_OPCODE => Self::UnknownOpcode,
            codes::UNEXPECTED_EXPRESSION_OPCODE => Self::UnexpectedExpressionOpcode,
            codes::UNALIGNED_STREAM_END => Self::UnalignedStreamEnd,
            codes::INVALID_BLOCK_SIGNATURE => Self::InvalidBlockSignature,
            codes::UNBALANCED_NESTING => Self::UnbalancedNesting,
            codes::FORMAT_ERROR => Self::Format,
            _ => Self::Unknown,
        }
    }

    /// The code used for errors of this kind.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::InvalidHeader => codes::INVALID_HEADER,
            Self::InvalidSection => codes::INVALID_SECTION,
            Self::BadNumber => codes::BAD_NUMBER,
            Self::UnexpectedEnd => codes::UNEXPECTED_END,
            Self::MalformedEntry => codes::MALFORMED_ENTRY,
            Self::SectionLengthMismatch => codes::SECTION_LENGTH_MISMATCH,
            Self::UnknownOpcode => codes::UNKNOWN_OPCODE,
            Self::UnexpectedExpressionOpcode => codes::UNEXPECTED_EXPRESSION_OPCODE,
            Self::UnalignedStreamEnd => codes::UNALIGNED_STREAM_END,
            Self::InvalidBlockSignature => codes::INVALID_BLOCK_SIGNATURE,
            Self::UnbalancedNesting => codes::UNBALANCED_NESTING,
            Self::Format => codes::FORMAT_ERROR,
            Self::Unknown => 0,
        }
    }

    /// The category errors of this kind are reported under.
    #[must_use]
    pub const fn category(self) -> ErrorCategory {
        match self {
            Self::InvalidBlockSignature | Self::UnbalancedNesting => ErrorCategory::Validation,
            Self::Format => ErrorCategory::System,
            Self::Unknown => ErrorCategory::Unknown,
            _ => ErrorCategory::Parse,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
