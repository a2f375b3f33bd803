// WDUMP - wdump-decoder
// Module: WebAssembly Module Decoder
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

#![forbid(unsafe_code)] // Rule 2

//! WebAssembly module decoder for wdump
//!
//! This crate decodes MVP modules in a single pass. [`ModuleReader`] frames
//! the header and sections and reports each decoded entry to a [`Visitor`];
//! function bodies are handed over as a bounded cursor that
//! [`InstructionDecoder`] turns into [`Instruction`]s.
//!
//! ```
//! use wdump_decoder::{read_module, NoOpVisitor};
//!
//! let module = [0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00];
//! read_module(&module, &mut NoOpVisitor).unwrap();
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::module_name_repetitions)]

extern crate alloc;

/// Owned module built from visitor events
pub mod collect;
/// Initialization expressions
pub mod init_expr;
/// Instruction decoding and encoding
pub mod instructions;
/// Module reader
pub mod reader;
/// Visitor trait
pub mod visitor;

pub use collect::{CodeEntry, CollectedSection, GlobalEntry, Module, ModuleCollector, SectionContent};
pub use init_expr::read_init_expr;
pub use instructions::{
    decode_instruction, encode_instruction, encode_instructions, Immediate, Instruction,
    InstructionDecoder,
};
pub use reader::{read_module, ModuleReader, ReaderConfig};
pub use visitor::{NoOpVisitor, Visitor};
