// WDUMP - wdump-printer
// Module: Module Printer
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Whole-module printing.
//!
//! [`WastPrinter`] is a [`Visitor`]: driven by the module reader it prints
//! while decoding, without building the module in memory. A module that was
//! already collected is printed by replaying it through the same callbacks,
//! so both paths produce the same text.

use alloc::{string::String, vec::Vec};
use core::fmt::Write;

use log::debug;
use wdump_decoder::{
    Instruction, InstructionDecoder, Module, ModuleReader, ReaderConfig, SectionContent, Visitor,
};
use wdump_error::Result;
use wdump_format::{
    BinaryReader, DataSegment, ElementEntry, ExportEntry, FunctionBody, FunctionType, GlobalType,
    ImportEntry, InitExpr, MemoryType, ModuleHeader, Section, TableType,
};

use crate::{
    expr_printer::ExprPrinter,
    printing,
    sexpr::{CommentEscaped, SexprWriter},
};

/// Printer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Emit section, count and custom section comments
    pub verbose:        bool,
    /// Fail on unbalanced `block`/`loop`/`if` nesting instead of clamping
    pub strict_nesting: bool,
}

impl PrinterConfig {
    /// Same configuration with verbose comments switched on or off
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Same configuration with strict nesting switched on or off
    #[must_use]
    pub const fn with_strict_nesting(mut self, strict_nesting: bool) -> Self {
        self.strict_nesting = strict_nesting;
        self
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            verbose:        false,
            strict_nesting: true,
        }
    }
}

/// Prints a module as an s-expression.
#[derive(Debug)]
pub struct WastPrinter<W: Write> {
    out:            SexprWriter<W>,
    config:         PrinterConfig,
    /// Type index of every function declared so far
    function_types: Vec<u32>,
}

impl<W: Write> WastPrinter<W> {
    /// Create a printer writing into `out`.
    pub fn new(out: W, config: PrinterConfig) -> Self {
        Self {
            out: SexprWriter::new(out),
            config,
            function_types: Vec::new(),
        }
    }

    /// Recover the sink.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    /// Print an already collected module.
    pub fn print_collected(&mut self, module: &Module) -> Result<()> {
        self.module_start()?;
        self.header(&module.header)?;
        for collected in &module.sections {
            let section = &collected.section;
            self.section_start(section)?;
            match &collected.content {
                SectionContent::Custom(payload) => self.custom_section(section, payload)?,
                SectionContent::Type(types) => {
                    self.type_section(types.len() as u32)?;
                    for function_type in types {
                        self.function_type(function_type)?;
                    }
                }
                SectionContent::Import(imports) => {
                    self.import_section(imports.len() as u32)?;
                    for entry in imports {
                        self.import_entry(entry)?;
                    }
                }
                SectionContent::Function(functions) => {
                    self.function_section(functions.len() as u32)?;
                    for (index, type_index) in functions.iter().enumerate() {
                        self.function_entry(index as u32, *type_index)?;
                    }
                }
                SectionContent::Table(tables) => {
                    self.table_section(tables.len() as u32)?;
                    for table in tables {
                        self.table_entry(table)?;
                    }
                }
                SectionContent::Memory(memories) => {
                    self.memory_section(memories.len() as u32)?;
                    for memory in memories {
                        self.memory_entry(memory)?;
                    }
                }
                SectionContent::Global(globals) => {
                    self.global_section(globals.len() as u32)?;
                    for global in globals {
                        self.global_entry(&global.global_type, &global.init)?;
                    }
                }
                SectionContent::Export(exports) => {
                    self.export_section(exports.len() as u32)?;
                    for entry in exports {
                        self.export_entry(entry)?;
                    }
                }
                SectionContent::Start(index) => self.start_section(*index)?,
                SectionContent::Element(elements) => {
                    self.element_section(elements.len() as u32)?;
                    for entry in elements {
                        self.element_entry(entry)?;
                    }
                }
                SectionContent::Code(bodies) => {
                    self.code_section(bodies.len() as u32)?;
                    for (index, entry) in bodies.iter().enumerate() {
                        let mut expr = self.begin_function(index as u32, &entry.body)?;
                        for instruction in &entry.instructions {
                            expr.print(&mut self.out, instruction)?;
                        }
                        self.end_function(expr)?;
                        self.function_body_end(&entry.body)?;
                    }
                }
                SectionContent::Data(segments) => {
                    self.data_section(segments.len() as u32)?;
                    for segment in segments {
                        self.data_segment(segment)?;
                    }
                }
            }
            self.section_end(section)?;
        }
        self.module_end()
    }

    fn count(&mut self, count: u32) -> Result<()> {
        if self.config.verbose {
            self.out.comment(format_args!("count: {}", count))?;
        }
        Ok(())
    }

    fn begin_function(&mut self, index: u32, body: &FunctionBody) -> Result<ExprPrinter> {
        self.out.fresh_line()?;
        self.out.open("func")?;
        if let Some(type_index) = self.function_types.get(index as usize) {
            self.out.list("type", type_index)?;
        }
        if body.locals.iter().any(|entry| entry.count > 0) {
            self.out.fresh_line()?;
            printing::locals(&mut self.out, body)?;
        }
        Ok(ExprPrinter::new(self.out.indent(), self.config.strict_nesting))
    }

    fn end_function(&mut self, expr: ExprPrinter) -> Result<()> {
        expr.finish(&mut self.out)?;
        self.out.close()
    }
}

impl<W: Write> Visitor for WastPrinter<W> {
    fn header(&mut self, _header: &ModuleHeader) -> Result<()> {
        self.function_types.clear();
        self.out.open("module")
    }

    fn module_end(&mut self) -> Result<()> {
        self.out.close()?;
        self.out.fresh_line()
    }

    fn section_start(&mut self, section: &Section) -> Result<()> {
        if self.config.verbose {
            self.out.comment(format_args!(
                "section {} ({} bytes)",
                section.code, section.length
            ))?;
        }
        Ok(())
    }

    fn custom_section(&mut self, section: &Section, payload: &[u8]) -> Result<()> {
        if self.config.verbose {
            let name = section.name.as_deref().unwrap_or_default();
            self.out.block_comment(format_args!(
                "custom \"{}\" {} bytes",
                CommentEscaped(name.as_bytes()),
                payload.len()
            ))?;
        }
        Ok(())
    }

    fn type_section(&mut self, count: u32) -> Result<()> {
        self.count(count)
    }

    fn function_type(&mut self, function_type: &FunctionType) -> Result<()> {
        self.out.fresh_line()?;
        printing::function_type(&mut self.out, function_type)
    }

    fn import_section(&mut self, count: u32) -> Result<()> {
        self.count(count)
    }

    fn import_entry(&mut self, entry: &ImportEntry) -> Result<()> {
        self.out.fresh_line()?;
        printing::import_entry(&mut self.out, entry)
    }

    fn function_section(&mut self, count: u32) -> Result<()> {
        self.count(count)
    }

    fn function_entry(&mut self, _index: u32, type_index: u32) -> Result<()> {
        self.function_types.push(type_index);
        Ok(())
    }

    fn table_section(&mut self, count: u32) -> Result<()> {
        self.count(count)
    }

    fn table_entry(&mut self, table_type: &TableType) -> Result<()> {
        self.out.fresh_line()?;
        printing::table_type(&mut self.out, table_type)
    }

    fn memory_section(&mut self, count: u32) -> Result<()> {
        self.count(count)
    }

    fn memory_entry(&mut self, memory_type: &MemoryType) -> Result<()> {
        self.out.fresh_line()?;
        printing::memory_type(&mut self.out, memory_type)
    }

    fn global_section(&mut self, count: u32) -> Result<()> {
        self.count(count)
    }

    fn global_entry(&mut self, global_type: &GlobalType, init: &InitExpr) -> Result<()> {
        self.out.fresh_line()?;
        printing::global_entry(&mut self.out, global_type, init)
    }

    fn export_section(&mut self, count: u32) -> Result<()> {
        self.count(count)
    }

    fn export_entry(&mut self, entry: &ExportEntry) -> Result<()> {
        self.out.fresh_line()?;
        printing::export_entry(&mut self.out, entry)
    }

    fn start_section(&mut self, function_index: u32) -> Result<()> {
        self.out.fresh_line()?;
        self.out.list("start", function_index)
    }

    fn element_section(&mut self, count: u32) -> Result<()> {
        self.count(count)
    }

    fn element_entry(&mut self, entry: &ElementEntry) -> Result<()> {
        self.out.fresh_line()?;
        printing::element_entry(&mut self.out, entry)
    }

    fn code_section(&mut self, count: u32) -> Result<()> {
        self.count(count)
    }

    fn function_body(
        &mut self,
        index: u32,
        body: &FunctionBody,
        code: &mut BinaryReader<'_>,
    ) -> Result<()> {
        let mut expr = self.begin_function(index, body)?;
        let end = code.end();
        let out = &mut self.out;
        InstructionDecoder::decode(code, end, |instruction: &Instruction| {
            expr.print(out, instruction)
        })?;
        self.end_function(expr)
    }

    fn data_section(&mut self, count: u32) -> Result<()> {
        self.count(count)
    }

    fn data_segment(&mut self, segment: &DataSegment) -> Result<()> {
        self.out.fresh_line()?;
        printing::data_segment(&mut self.out, segment)
    }
}

/// Decode `bytes` and print the module in one pass.
pub fn print_module(
    bytes: &[u8],
    config: &PrinterConfig,
    reader_config: &ReaderConfig,
) -> Result<String> {
    let mut printer = WastPrinter::new(String::new(), *config);
    ModuleReader::with_config(bytes, *reader_config).read(&mut printer)?;
    let text = printer.into_inner();
    debug!("printed {} byte module as {} bytes of text", bytes.len(), text.len());
    Ok(text)
}

/// Print a collected module.
pub fn print_collected(module: &Module, config: &PrinterConfig) -> Result<String> {
    let mut printer = WastPrinter::new(String::new(), *config);
    printer.print_collected(module)?;
    Ok(printer.into_inner())
}

#[cfg(test)]
mod tests {
    use wdump_error::ErrorKind;
    use wdump_format::binary;

    use super::*;

    fn module_with(sections: &[(u8, &[u8])]) -> alloc::vec::Vec<u8> {
        let mut bytes = binary::write_header();
        for (id, payload) in sections {
            bytes.extend_from_slice(&binary::write_section_header(*id, payload.len() as u32));
            bytes.extend_from_slice(payload);
        }
        bytes
    }

    fn print(bytes: &[u8]) -> Result<String> {
        print_module(bytes, &PrinterConfig::default(), &ReaderConfig::default())
    }

    #[test]
    fn test_empty_module() {
        assert_eq!(print(&binary::write_header()).unwrap(), "(module)\n");
    }

    #[test]
    fn test_type_section() {
        let bytes = module_with(&[(1, &[0x01, 0x60, 0x02, 0x7F, 0x7F, 0x01, 0x7F])]);
        assert_eq!(
            print(&bytes).unwrap(),
            "(module\n  (func (param i32 i32) (result i32)))\n"
        );
    }

    #[test]
    fn test_function_body() {
        let bytes = module_with(&[
            (1, &[0x01, 0x60, 0x00, 0x01, 0x7F]),
            (3, &[0x01, 0x00]),
            (10, &[0x01, 0x06, 0x01, 0x01, 0x7F, 0x41, 0x7B, 0x0B]),
        ]);
        assert_eq!(
            print(&bytes).unwrap(),
            "(module\n  (func (result i32))\n  (func (type 0)\n    (local i32)\n    i32.const -5\n    end))\n"
        );
    }

    #[test]
    fn test_bad_block_signature() {
        let bytes = module_with(&[(10, &[0x01, 0x05, 0x00, 0x02, 0xFF, 0x0B, 0x0B])]);
        let err = print(&bytes).unwrap_err();
        assert!(err.is(ErrorKind::InvalidBlockSignature));
        assert_eq!(err.value, Some(0xFF));
    }

    #[test]
    fn test_verbose_comments() {
        let mut custom = binary::write_string("name");
        custom.extend_from_slice(&[0, 1]);
        let bytes = module_with(&[(0, &custom), (8, &[0x02])]);
        let config = PrinterConfig::default().with_verbose(true);
        let text = print_module(&bytes, &config, &ReaderConfig::default()).unwrap();
        assert_eq!(
            text,
            "(module\n  ;; section custom (7 bytes)\n  (; custom \"name\" 2 bytes ;)\n  ;; section start (1 bytes)\n  (start 2))\n"
        );
    }

    #[test]
    fn test_custom_section_name_stays_inside_comment() {
        let bytes = module_with(&[(0, &binary::write_string("a;)b"))]);
        let config = PrinterConfig::default().with_verbose(true);
        let text = print_module(&bytes, &config, &ReaderConfig::default()).unwrap();
        assert!(text.contains("(; custom \"a\\3b)b\" 0 bytes ;)"));
        assert_eq!(text.matches(";)").count(), 1);
    }

    #[test]
    fn test_custom_section_silent_by_default() {
        let mut custom = binary::write_string("x");
        custom.push(9);
        let bytes = module_with(&[(0, &custom)]);
        assert_eq!(print(&bytes).unwrap(), "(module)\n");
    }
}
