// WDUMP - wdump-format
// Module: Module Entries
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Decoded module entries.
//!
//! These are the values the module reader hands to a visitor, one per
//! section entry. They own their data and do not borrow from the input.

use alloc::{string::String, vec::Vec};

use crate::types::{ExternalKind, GlobalType, MemoryType, SectionCode, TableType, ValueType};

/// The 8-byte module header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleHeader {
    /// Magic number, `0x6D736100` for a valid module
    pub magic:   u32,
    /// Format version, `1` for a valid module
    pub version: u32,
}

/// Framing information of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Section code
    pub code:           SectionCode,
    /// Name of a custom section
    pub name:           Option<String>,
    /// Declared payload length, including a custom section's name
    pub length:         u32,
    /// Absolute offset of the first payload byte
    pub payload_offset: usize,
}

impl Section {
    /// Absolute offset one past the last payload byte.
    pub fn end_offset(&self) -> usize {
        self.payload_offset + self.length as usize
    }
}

/// What an import brings into the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// A function of the given type index
    Function(u32),
    /// A table
    Table(TableType),
    /// A linear memory
    Memory(MemoryType),
    /// A global
    Global(GlobalType),
}

impl ImportKind {
    /// The external kind tag of this import.
    pub const fn external_kind(&self) -> ExternalKind {
        match self {
            Self::Function(_) => ExternalKind::Function,
            Self::Table(_) => ExternalKind::Table,
            Self::Memory(_) => ExternalKind::Memory,
            Self::Global(_) => ExternalKind::Global,
        }
    }
}

/// One import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    /// Module name
    pub module: String,
    /// Field name
    pub field:  String,
    /// Imported entity
    pub kind:   ImportKind,
}

/// One export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    /// Exported name
    pub field: String,
    /// Kind of the exported entity
    pub kind:  ExternalKind,
    /// Index in the kind's index space
    pub index: u32,
}

/// A constant initialization expression.
///
/// In the binary each variant is followed by an `end` opcode. Float values
/// keep their raw bits so NaN payloads survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitExpr {
    /// `get_global`
    GetGlobal(u32),
    /// `i32.const`
    I32Const(i32),
    /// `i64.const`
    I64Const(i64),
    /// `f32.const`, as bits
    F32Const(u32),
    /// `f64.const`, as bits
    F64Const(u64),
}

/// An element segment initializing part of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementEntry {
    /// Table index
    pub table_index: u32,
    /// Offset of the first element
    pub offset:      InitExpr,
    /// Function indices
    pub functions:   Vec<u32>,
}

/// A run of locals sharing a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalEntry {
    /// Number of locals
    pub count:      u32,
    /// Their type
    pub value_type: ValueType,
}

/// Most locals a single function body may declare.
pub const MAX_FUNCTION_LOCALS: u32 = 50_000;

/// The header of a function body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionBody {
    /// Local declarations
    pub locals: Vec<LocalEntry>,
    /// Body size in bytes as declared, locals included
    pub size:   u32,
}

impl FunctionBody {
    /// Each local's type, runs expanded by their count.
    pub fn local_types(&self) -> impl Iterator<Item = ValueType> + '_ {
        self.locals
            .iter()
            .flat_map(|entry| core::iter::repeat(entry.value_type).take(entry.count as usize))
    }
}

/// A data segment initializing part of a memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSegment {
    /// Memory index
    pub memory_index: u32,
    /// Offset of the first byte
    pub offset:       InitExpr,
    /// Bytes to copy
    pub data:         Vec<u8>,
}
