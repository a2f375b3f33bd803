// WDUMP - wdump-decoder
// Module: Module Collector
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! A visitor that keeps everything it is told.
//!
//! [`ModuleCollector`] turns the streaming events into an owned [`Module`]:
//! the header plus every section in binary order, with function bodies
//! decoded into instruction lists.

use alloc::vec::Vec;

use wdump_error::{Error, Result};
use wdump_format::{
    BinaryReader, DataSegment, ElementEntry, ExportEntry, FunctionBody, FunctionType, GlobalType,
    ImportEntry, InitExpr, MemoryType, ModuleHeader, Section, TableType,
};

use crate::{
    instructions::{Instruction, InstructionDecoder},
    reader::{ModuleReader, ReaderConfig},
    visitor::Visitor,
};

/// A global definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalEntry {
    /// Its type
    pub global_type: GlobalType,
    /// Its initializer
    pub init:        InitExpr,
}

/// A function body with its decoded instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEntry {
    /// Locals and declared size
    pub body:         FunctionBody,
    /// Every instruction, including the final `end`
    pub instructions: Vec<Instruction>,
}

/// The entries of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionContent {
    /// Custom section payload after the name
    Custom(Vec<u8>),
    /// Function signatures
    Type(Vec<FunctionType>),
    /// Imports
    Import(Vec<ImportEntry>),
    /// Type index of each defined function
    Function(Vec<u32>),
    /// Table definitions
    Table(Vec<TableType>),
    /// Memory definitions
    Memory(Vec<MemoryType>),
    /// Global definitions
    Global(Vec<GlobalEntry>),
    /// Exports
    Export(Vec<ExportEntry>),
    /// Start function index
    Start(u32),
    /// Element segments
    Element(Vec<ElementEntry>),
    /// Function bodies
    Code(Vec<CodeEntry>),
    /// Data segments
    Data(Vec<DataSegment>),
}

impl SectionContent {
    /// Number of entries, or `None` for sections without a count.
    pub fn count(&self) -> Option<usize> {
        match self {
            Self::Custom(_) | Self::Start(_) => None,
            Self::Type(entries) => Some(entries.len()),
            Self::Import(entries) => Some(entries.len()),
            Self::Function(entries) => Some(entries.len()),
            Self::Table(entries) => Some(entries.len()),
            Self::Memory(entries) => Some(entries.len()),
            Self::Global(entries) => Some(entries.len()),
            Self::Export(entries) => Some(entries.len()),
            Self::Element(entries) => Some(entries.len()),
            Self::Code(entries) => Some(entries.len()),
            Self::Data(entries) => Some(entries.len()),
        }
    }
}

/// A section with its decoded entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedSection {
    /// Framing
    pub section: Section,
    /// Entries
    pub content: SectionContent,
}

/// A fully decoded module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Header
    pub header:   ModuleHeader,
    /// Sections in binary order
    pub sections: Vec<CollectedSection>,
}

impl Module {
    /// Decode `bytes` into a module.
    pub fn from_bytes(bytes: &[u8], config: ReaderConfig) -> Result<Self> {
        let mut collector = ModuleCollector::new();
        ModuleReader::with_config(bytes, config).read(&mut collector)?;
        collector.finish()
    }

    /// All function signatures, across type sections.
    pub fn types(&self) -> impl Iterator<Item = &FunctionType> {
        self.sections.iter().flat_map(|s| match &s.content {
            SectionContent::Type(types) => types.iter(),
            _ => [].iter(),
        })
    }

    /// All function bodies, across code sections.
    pub fn code(&self) -> impl Iterator<Item = &CodeEntry> {
        self.sections.iter().flat_map(|s| match &s.content {
            SectionContent::Code(code) => code.iter(),
            _ => [].iter(),
        })
    }

    /// The start function, if any.
    pub fn start(&self) -> Option<u32> {
        self.sections.iter().find_map(|s| match s.content {
            SectionContent::Start(index) => Some(index),
            _ => None,
        })
    }
}

/// [`Visitor`] that builds a [`Module`].
#[derive(Debug, Default)]
pub struct ModuleCollector {
    header:   Option<ModuleHeader>,
    sections: Vec<CollectedSection>,
    current:  Option<CollectedSection>,
}

impl ModuleCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected module; fails if no header was seen.
    pub fn finish(self) -> Result<Module> {
        let header = self
            .header
            .ok_or_else(|| Error::invalid_header("Module header was never read", 0))?;
        Ok(Module {
            header,
            sections: self.sections,
        })
    }

    fn content(&mut self) -> Result<&mut SectionContent> {
        self.current
            .as_mut()
            .map(|current| &mut current.content)
            .ok_or_else(|| Error::malformed("Section entry outside of a section", 0))
    }
}

/// Push onto the open section if it has the expected variant.
macro_rules! push_entry {
    ($self:ident, $variant:ident, $entry:expr) => {{
        if let SectionContent::$variant(entries) = $self.content()? {
            entries.push($entry);
        }
        Ok(())
    }};
}

impl Visitor for ModuleCollector {
    fn header(&mut self, header: &ModuleHeader) -> Result<()> {
        self.header = Some(*header);
        Ok(())
    }

    fn section_start(&mut self, section: &Section) -> Result<()> {
        use wdump_format::SectionCode;

        let content = match section.code {
            SectionCode::Custom => SectionContent::Custom(Vec::new()),
            SectionCode::Type => SectionContent::Type(Vec::new()),
            SectionCode::Import => SectionContent::Import(Vec::new()),
            SectionCode::Function => SectionContent::Function(Vec::new()),
            SectionCode::Table => SectionContent::Table(Vec::new()),
            SectionCode::Memory => SectionContent::Memory(Vec::new()),
            SectionCode::Global => SectionContent::Global(Vec::new()),
            SectionCode::Export => SectionContent::Export(Vec::new()),
            SectionCode::Start => SectionContent::Start(0),
            SectionCode::Element => SectionContent::Element(Vec::new()),
            SectionCode::Code => SectionContent::Code(Vec::new()),
            SectionCode::Data => SectionContent::Data(Vec::new()),
        };
        self.current = Some(CollectedSection {
            section: section.clone(),
            content,
        });
        Ok(())
    }

    fn section_end(&mut self, _section: &Section) -> Result<()> {
        if let Some(current) = self.current.take() {
            self.sections.push(current);
        }
        Ok(())
    }

    fn custom_section(&mut self, _section: &Section, payload: &[u8]) -> Result<()> {
        if let SectionContent::Custom(bytes) = self.content()? {
            bytes.extend_from_slice(payload);
        }
        Ok(())
    }

    fn function_type(&mut self, function_type: &FunctionType) -> Result<()> {
        push_entry!(self, Type, function_type.clone())
    }

    fn import_entry(&mut self, entry: &ImportEntry) -> Result<()> {
        push_entry!(self, Import, entry.clone())
    }

    fn function_entry(&mut self, _index: u32, type_index: u32) -> Result<()> {
        push_entry!(self, Function, type_index)
    }

    fn table_entry(&mut self, table_type: &TableType) -> Result<()> {
        push_entry!(self, Table, *table_type)
    }

    fn memory_entry(&mut self, memory_type: &MemoryType) -> Result<()> {
        push_entry!(self, Memory, *memory_type)
    }

    fn global_entry(&mut self, global_type: &GlobalType, init: &InitExpr) -> Result<()> {
        push_entry!(
            self,
            Global,
            GlobalEntry {
                global_type: *global_type,
                init:        *init,
            }
        )
    }

    fn export_entry(&mut self, entry: &ExportEntry) -> Result<()> {
        push_entry!(self, Export, entry.clone())
    }

    fn start_section(&mut self, function_index: u32) -> Result<()> {
        if let SectionContent::Start(index) = self.content()? {
            *index = function_index;
        }
        Ok(())
    }

    fn element_entry(&mut self, entry: &ElementEntry) -> Result<()> {
        push_entry!(self, Element, entry.clone())
    }

    fn function_body(
        &mut self,
        _index: u32,
        body: &FunctionBody,
        code: &mut BinaryReader<'_>,
    ) -> Result<()> {
        let end = code.end();
        let instructions = InstructionDecoder::decode_all(code, end)?;
        push_entry!(
            self,
            Code,
            CodeEntry {
                body: body.clone(),
                instructions,
            }
        )
    }

    fn data_segment(&mut self, segment: &DataSegment) -> Result<()> {
        push_entry!(self, Data, segment.clone())
    }
}
