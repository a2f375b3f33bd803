// WDUMP - wdump-format
// Module: WebAssembly Binary Format Definitions
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

#![forbid(unsafe_code)] // Rule 2

//! WebAssembly format handling for wdump
//!
//! This crate defines the MVP binary format: LEB128 and fixed-width number
//! encodings, a bounded byte cursor, the opcode table, and the types of the
//! entries a module is made of.
//!
//! It is designed to work in both std and no_std environments when configured
//! with the appropriate feature flags; an allocator is always required.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::module_name_repetitions)]

extern crate alloc;

/// Number encodings and format constants
pub mod binary;
/// Decoded module entries
pub mod module;
/// The opcode table
pub mod opcode;
/// Bounded byte cursor
pub mod reader;
/// Type and section codes
pub mod types;

pub use module::{
    DataSegment, ElementEntry, ExportEntry, FunctionBody, ImportEntry, ImportKind, InitExpr,
    LocalEntry, ModuleHeader, Section, MAX_FUNCTION_LOCALS,
};
pub use opcode::{ImmediateShape, OpCode};
pub use reader::BinaryReader;
pub use types::{
    ExternalKind, FunctionType, GlobalType, MemoryType, ResizableLimits, SectionCode, TableType,
    TypeCode, ValueType,
};
