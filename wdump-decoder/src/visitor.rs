// WDUMP - wdump-decoder
// Module: Module Visitor
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Callbacks driven by the module reader.
//!
//! The reader calls these in binary order while it decodes a module. Every
//! method has a no-op default, so an implementation only overrides what it
//! needs. Returning an error from any callback aborts the decode and the
//! error is handed back to the reader's caller.
//!
//! For each section the order is `section_start`, the section's count
//! callback (`type_section`, `import_section`, ...), one callback per entry,
//! then `section_end`.

use wdump_error::Result;
use wdump_format::{
    BinaryReader, DataSegment, ElementEntry, ExportEntry, FunctionBody, FunctionType, GlobalType,
    ImportEntry, InitExpr, MemoryType, ModuleHeader, Section, TableType,
};

/// Receiver of module decoding events.
#[allow(unused_variables)]
pub trait Visitor {
    /// Decoding is about to start.
    fn module_start(&mut self) -> Result<()> {
        Ok(())
    }

    /// The whole module was decoded.
    fn module_end(&mut self) -> Result<()> {
        Ok(())
    }

    /// The header was read and is valid.
    fn header(&mut self, header: &ModuleHeader) -> Result<()> {
        Ok(())
    }

    /// A section's framing was read.
    fn section_start(&mut self, section: &Section) -> Result<()> {
        Ok(())
    }

    /// A section was fully decoded.
    fn section_end(&mut self, section: &Section) -> Result<()> {
        Ok(())
    }

    /// A custom section; `payload` is everything after the name.
    fn custom_section(&mut self, section: &Section, payload: &[u8]) -> Result<()> {
        Ok(())
    }

    /// Type section with `count` entries.
    fn type_section(&mut self, count: u32) -> Result<()> {
        Ok(())
    }

    /// One function signature.
    fn function_type(&mut self, function_type: &FunctionType) -> Result<()> {
        Ok(())
    }

    /// Import section with `count` entries.
    fn import_section(&mut self, count: u32) -> Result<()> {
        Ok(())
    }

    /// One import.
    fn import_entry(&mut self, entry: &ImportEntry) -> Result<()> {
        Ok(())
    }

    /// Function section with `count` entries.
    fn function_section(&mut self, count: u32) -> Result<()> {
        Ok(())
    }

    /// The `index`-th function declaration (counting within the section).
    fn function_entry(&mut self, index: u32, type_index: u32) -> Result<()> {
        Ok(())
    }

    /// Table section with `count` entries.
    fn table_section(&mut self, count: u32) -> Result<()> {
        Ok(())
    }

    /// One table definition.
    fn table_entry(&mut self, table_type: &TableType) -> Result<()> {
        Ok(())
    }

    /// Memory section with `count` entries.
    fn memory_section(&mut self, count: u32) -> Result<()> {
        Ok(())
    }

    /// One memory definition.
    fn memory_entry(&mut self, memory_type: &MemoryType) -> Result<()> {
        Ok(())
    }

    /// Global section with `count` entries.
    fn global_section(&mut self, count: u32) -> Result<()> {
        Ok(())
    }

    /// One global definition with its initializer.
    fn global_entry(&mut self, global_type: &GlobalType, init: &InitExpr) -> Result<()> {
        Ok(())
    }

    /// Export section with `count` entries.
    fn export_section(&mut self, count: u32) -> Result<()> {
        Ok(())
    }

    /// One export.
    fn export_entry(&mut self, entry: &ExportEntry) -> Result<()> {
        Ok(())
    }

    /// The start function.
    fn start_section(&mut self, function_index: u32) -> Result<()> {
        Ok(())
    }

    /// Element section with `count` entries.
    fn element_section(&mut self, count: u32) -> Result<()> {
        Ok(())
    }

    /// One element segment.
    fn element_entry(&mut self, entry: &ElementEntry) -> Result<()> {
        Ok(())
    }

    /// One function index of `entry`, in segment order.
    fn element_function(&mut self, entry: &ElementEntry, function_index: u32) -> Result<()> {
        Ok(())
    }

    /// Every function of `entry` has been visited.
    fn element_entry_end(&mut self, entry: &ElementEntry) -> Result<()> {
        Ok(())
    }

    /// Code section with `count` bodies.
    fn code_section(&mut self, count: u32) -> Result<()> {
        Ok(())
    }

    /// A function body. `code` is bounded to the body's instruction bytes;
    /// the reader continues after the body however much of it was consumed.
    fn function_body(
        &mut self,
        index: u32,
        body: &FunctionBody,
        code: &mut BinaryReader<'_>,
    ) -> Result<()> {
        Ok(())
    }

    /// The body passed to the last `function_body` call is finished.
    fn function_body_end(&mut self, body: &FunctionBody) -> Result<()> {
        Ok(())
    }

    /// Data section with `count` entries.
    fn data_section(&mut self, count: u32) -> Result<()> {
        Ok(())
    }

    /// One data segment.
    fn data_segment(&mut self, segment: &DataSegment) -> Result<()> {
        Ok(())
    }
}

/// A visitor that ignores every event; decoding only validates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpVisitor;

impl Visitor for NoOpVisitor {}
