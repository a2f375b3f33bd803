// WDUMP - wdump-error
// Module: Error Handling
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! wdump error handling library
//!
//! This library provides the error type shared by the decoder and printer
//! crates. Errors are small `Copy` values so they can be raised from `const`
//! contexts and passed across visitor callbacks without allocation.
//!
//! # Error Categories
//!
//! ## Parse Errors (1000-1199)
//! - Invalid header, unknown section codes
//! - Malformed or truncated integers
//! - Unknown opcodes and forbidden initialization expressions
//! - Misaligned instruction streams
//!
//! ## Validation Errors (1200-1299)
//! - Invalid block signatures
//! - Unbalanced `end`/`else`
//!
//! # Usage
//!
//! ```
//! use wdump_error::{Error, ErrorKind};
//!
//! let error = Error::unknown_opcode(0xff, 12);
//! assert_eq!(error.kind(), ErrorKind::UnknownOpcode);
//! assert_eq!(error.offset, Some(12));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)] // Rule 2
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

/// Error codes for wdump
pub mod codes;
/// Error and error handling types
pub mod errors;
/// Error kind definitions
pub mod kinds;

// Re-export key types
pub use errors::{Error, ErrorCategory};
pub use kinds::ErrorKind;

/// A specialized `Result` type for wdump operations.
pub type Result<T> = core::result::Result<T, Error>;
