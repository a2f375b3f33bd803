// WDUMP - wdump-printer
// Module: Canonical Module Printer
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

#![forbid(unsafe_code)] // Rule 2

//! Canonical text printer for wdump
//!
//! Renders decoded modules as deterministic s-expressions, one entry per
//! line. The same decoded input always gives byte-identical text, whether it
//! is printed while decoding ([`print_module`]) or from a collected
//! [`wdump_decoder::Module`] ([`print_collected`]).
//!
//! ```
//! use wdump_decoder::ReaderConfig;
//! use wdump_printer::{print_module, PrinterConfig};
//!
//! let module = [0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00];
//! let text = print_module(&module, &PrinterConfig::default(), &ReaderConfig::default()).unwrap();
//! assert_eq!(text, "(module)\n");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::module_name_repetitions)]

extern crate alloc;

/// Function body printing and nesting checks
pub mod expr_printer;
/// Rendering of individual entries
pub mod printing;
/// S-expression writer
pub mod sexpr;
/// Whole-module printer
pub mod wast_printer;

pub use expr_printer::ExprPrinter;
pub use sexpr::SexprWriter;
pub use wast_printer::{print_collected, print_module, PrinterConfig, WastPrinter};
