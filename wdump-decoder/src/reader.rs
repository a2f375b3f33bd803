// WDUMP - wdump-decoder
// Module: Module Reader
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Streaming module reader.
//!
//! The reader walks a module once, front to back: header, then each section
//! in the order it appears. Every section is framed by its declared length;
//! entries are decoded from a cursor limited to that payload and handed to a
//! [`Visitor`] as they are read. Nothing is retained after a callback
//! returns.

use alloc::{borrow::ToOwned, vec::Vec};

use log::{debug, trace, warn};
use wdump_error::{Error, Result};
use wdump_format::{
    binary, BinaryReader, DataSegment, ElementEntry, ExportEntry, ExternalKind, FunctionBody,
    FunctionType, GlobalType, ImportEntry, ImportKind, LocalEntry, MemoryType, ModuleHeader,
    ResizableLimits, Section, SectionCode, TableType, ValueType, MAX_FUNCTION_LOCALS,
};

use crate::{init_expr::read_init_expr, visitor::Visitor};

/// Reader configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Fail when a section's entries do not consume exactly its declared
    /// length. When disabled, trailing bytes are logged and skipped.
    pub strict_section_length: bool,
}

impl ReaderConfig {
    /// Strict framing (the default)
    pub const fn strict() -> Self {
        Self {
            strict_section_length: true,
        }
    }

    /// Tolerate trailing bytes at the end of a section
    pub const fn lenient() -> Self {
        Self {
            strict_section_length: false,
        }
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self::strict()
    }
}

/// Decodes a module and drives a [`Visitor`].
#[derive(Debug, Clone)]
pub struct ModuleReader<'a> {
    bytes:  &'a [u8],
    config: ReaderConfig,
}

impl<'a> ModuleReader<'a> {
    /// Create a reader with the default configuration.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_config(bytes, ReaderConfig::default())
    }

    /// Create a reader with an explicit configuration.
    pub fn with_config(bytes: &'a [u8], config: ReaderConfig) -> Self {
        Self { bytes, config }
    }

    /// The active configuration.
    pub fn config(&self) -> ReaderConfig {
        self.config
    }

    /// Decode the whole module, reporting every entry to `visitor`.
    ///
    /// The first error, whether raised by decoding or by the visitor, ends
    /// the decode and is returned.
    pub fn read<V: Visitor + ?Sized>(&self, visitor: &mut V) -> Result<()> {
        let mut reader = BinaryReader::new(self.bytes);

        visitor.module_start()?;
        let header = read_header(&mut reader)?;
        visitor.header(&header)?;

        while !reader.is_at_end() {
            self.read_section(&mut reader, visitor)?;
        }

        visitor.module_end()
    }

    fn read_section<V: Visitor + ?Sized>(
        &self,
        reader: &mut BinaryReader<'a>,
        visitor: &mut V,
    ) -> Result<()> {
        let code_offset = reader.position();
        let raw_code = reader.read_var_u7()?;
        let code = SectionCode::from_u8(raw_code)
            .ok_or_else(|| Error::invalid_section(u64::from(raw_code), code_offset))?;
        let length = reader.read_var_u32()?;
        let payload_offset = reader.position();
        let mut payload = reader.sub_reader(length as usize)?;

        let name = match code {
            SectionCode::Custom => Some(payload.read_string()?.to_owned()),
            _ => None,
        };
        let section = Section {
            code,
            name,
            length,
            payload_offset,
        };
        debug!(
            "{} section at {:#x}, {} bytes",
            section.code, section.payload_offset, section.length
        );

        visitor.section_start(&section)?;
        read_section_entries(&section, &mut payload, visitor)?;

        if !payload.is_at_end() {
            if self.config.strict_section_length {
                return Err(Error::section_length_mismatch(
                    section.end_offset(),
                    payload.position(),
                ));
            }
            warn!(
                "{} section: skipping {} trailing bytes at {:#x}",
                section.code,
                payload.remaining(),
                payload.position()
            );
        }

        visitor.section_end(&section)
    }
}

/// Decode `bytes` with the default configuration.
pub fn read_module<V: Visitor + ?Sized>(bytes: &[u8], visitor: &mut V) -> Result<()> {
    ModuleReader::new(bytes).read(visitor)
}

fn read_header(reader: &mut BinaryReader<'_>) -> Result<ModuleHeader> {
    let magic = reader
        .read_u32_le()
        .map_err(|_| Error::invalid_header("Truncated module header", 0))?;
    if magic != binary::WASM_MAGIC {
        return Err(Error::invalid_header("Bad magic number", 0).with_value(u64::from(magic)));
    }
    let version = reader
        .read_u32_le()
        .map_err(|_| Error::invalid_header("Truncated module header", 4))?;
    if version != binary::WASM_VERSION {
        return Err(Error::invalid_header("Unsupported version", 4).with_value(u64::from(version)));
    }
    Ok(ModuleHeader { magic, version })
}

fn read_section_entries<V: Visitor + ?Sized>(
    section: &Section,
    reader: &mut BinaryReader<'_>,
    visitor: &mut V,
) -> Result<()> {
    match section.code {
        SectionCode::Custom => {
            visitor.custom_section(section, reader.remaining_bytes())?;
            reader.skip_to(reader.end())
        }
        SectionCode::Type => {
            let count = reader.read_var_u32()?;
            visitor.type_section(count)?;
            for _ in 0..count {
                let function_type = read_function_type(reader)?;
                trace!("type {:?}", function_type);
                visitor.function_type(&function_type)?;
            }
            Ok(())
        }
        SectionCode::Import => {
            let count = reader.read_var_u32()?;
            visitor.import_section(count)?;
            for _ in 0..count {
                let entry = read_import_entry(reader)?;
                trace!("import {:?}", entry);
                visitor.import_entry(&entry)?;
            }
            Ok(())
        }
        SectionCode::Function => {
            let count = reader.read_var_u32()?;
            visitor.function_section(count)?;
            for index in 0..count {
                let type_index = reader.read_var_u32()?;
                visitor.function_entry(index, type_index)?;
            }
            Ok(())
        }
        SectionCode::Table => {
            let count = reader.read_var_u32()?;
            visitor.table_section(count)?;
            for _ in 0..count {
                visitor.table_entry(&read_table_type(reader)?)?;
            }
            Ok(())
        }
        SectionCode::Memory => {
            let count = reader.read_var_u32()?;
            visitor.memory_section(count)?;
            for _ in 0..count {
                let memory_type = MemoryType {
                    limits: read_limits(reader)?,
                };
                visitor.memory_entry(&memory_type)?;
            }
            Ok(())
        }
        SectionCode::Global => {
            let count = reader.read_var_u32()?;
            visitor.global_section(count)?;
            for _ in 0..count {
                let global_type = read_global_type(reader)?;
                let init = read_init_expr(reader)?;
                trace!("global {:?} = {:?}", global_type, init);
                visitor.global_entry(&global_type, &init)?;
            }
            Ok(())
        }
        SectionCode::Export => {
            let count = reader.read_var_u32()?;
            visitor.export_section(count)?;
            for _ in 0..count {
                let entry = ExportEntry {
                    field: reader.read_string()?.to_owned(),
                    kind:  read_external_kind(reader)?,
                    index: reader.read_var_u32()?,
                };
                trace!("export {:?}", entry);
                visitor.export_entry(&entry)?;
            }
            Ok(())
        }
        SectionCode::Start => visitor.start_section(reader.read_var_u32()?),
        SectionCode::Element => {
            let count = reader.read_var_u32()?;
            visitor.element_section(count)?;
            for _ in 0..count {
                let table_index = reader.read_var_u32()?;
                let offset = read_init_expr(reader)?;
                let functions = read_vec(reader, BinaryReader::read_var_u32)?;
                let entry = ElementEntry {
                    table_index,
                    offset,
                    functions,
                };
                trace!("element {:?}", entry);
                visitor.element_entry(&entry)?;
                for &function in &entry.functions {
                    visitor.element_function(&entry, function)?;
                }
                visitor.element_entry_end(&entry)?;
            }
            Ok(())
        }
        SectionCode::Code => {
            let count = reader.read_var_u32()?;
            visitor.code_section(count)?;
            for index in 0..count {
                read_function_body(index, reader, visitor)?;
            }
            Ok(())
        }
        SectionCode::Data => {
            let count = reader.read_var_u32()?;
            visitor.data_section(count)?;
            for _ in 0..count {
                let memory_index = reader.read_var_u32()?;
                let offset = read_init_expr(reader)?;
                let data = reader.read_byte_string()?.to_vec();
                let segment = DataSegment {
                    memory_index,
                    offset,
                    data,
                };
                trace!(
                    "data memory {} at {:?}, {} bytes",
                    segment.memory_index,
                    segment.offset,
                    segment.data.len()
                );
                visitor.data_segment(&segment)?;
            }
            Ok(())
        }
    }
}

/// Read a `varuint32` count followed by that many items.
fn read_vec<'a, T>(
    reader: &mut BinaryReader<'a>,
    mut read_item: impl FnMut(&mut BinaryReader<'a>) -> Result<T>,
) -> Result<Vec<T>> {
    let count = reader.read_var_u32()?;
    // Each item occupies at least one byte
    let mut items = Vec::with_capacity((count as usize).min(reader.remaining()));
    for _ in 0..count {
        items.push(read_item(reader)?);
    }
    Ok(items)
}

fn read_value_type(reader: &mut BinaryReader<'_>) -> Result<ValueType> {
    let offset = reader.position();
    let byte = reader.read_u8()?;
    ValueType::from_u8(byte)
        .ok_or_else(|| Error::malformed("Invalid value type", offset).with_value(u64::from(byte)))
}

fn read_external_kind(reader: &mut BinaryReader<'_>) -> Result<ExternalKind> {
    let offset = reader.position();
    let byte = reader.read_u8()?;
    ExternalKind::from_u8(byte)
        .ok_or_else(|| Error::malformed("Unknown external kind", offset).with_value(u64::from(byte)))
}

fn read_function_type(reader: &mut BinaryReader<'_>) -> Result<FunctionType> {
    let offset = reader.position();
    let form = reader.read_u8()?;
    if form != binary::FUNC_TYPE {
        return Err(Error::malformed("Expected function type form", offset).with_value(u64::from(form)));
    }
    let params = read_vec(reader, read_value_type)?;
    let result = if reader.read_flag()? {
        Some(read_value_type(reader)?)
    } else {
        None
    };
    Ok(FunctionType { params, result })
}

fn read_limits(reader: &mut BinaryReader<'_>) -> Result<ResizableLimits> {
    let has_max = reader.read_flag()?;
    let initial = reader.read_var_u32()?;
    let maximum = if has_max {
        Some(reader.read_var_u32()?)
    } else {
        None
    };
    Ok(ResizableLimits { initial, maximum })
}

fn read_table_type(reader: &mut BinaryReader<'_>) -> Result<TableType> {
    let offset = reader.position();
    let element_type = reader.read_u8()?;
    if element_type != binary::ANYFUNC_TYPE {
        return Err(Error::malformed("Table element type must be anyfunc", offset)
            .with_value(u64::from(element_type)));
    }
    Ok(TableType {
        limits: read_limits(reader)?,
    })
}

fn read_global_type(reader: &mut BinaryReader<'_>) -> Result<GlobalType> {
    Ok(GlobalType {
        content_type: read_value_type(reader)?,
        mutable:      reader.read_flag()?,
    })
}

fn read_import_entry(reader: &mut BinaryReader<'_>) -> Result<ImportEntry> {
    let module = reader.read_string()?.to_owned();
    let field = reader.read_string()?.to_owned();
    let kind = match read_external_kind(reader)? {
        ExternalKind::Function => ImportKind::Function(reader.read_var_u32()?),
        ExternalKind::Table => ImportKind::Table(read_table_type(reader)?),
        ExternalKind::Memory => ImportKind::Memory(MemoryType {
            limits: read_limits(reader)?,
        }),
        ExternalKind::Global => ImportKind::Global(read_global_type(reader)?),
    };
    Ok(ImportEntry {
        module,
        field,
        kind,
    })
}

fn read_function_body<V: Visitor + ?Sized>(
    index: u32,
    reader: &mut BinaryReader<'_>,
    visitor: &mut V,
) -> Result<()> {
    let size = reader.read_var_u32()?;
    let mut code = reader.sub_reader(size as usize)?;
    let mut total = 0u32;
    let locals = read_vec(&mut code, |input| {
        let offset = input.position();
        let count = input.read_var_u32()?;
        total = total
            .checked_add(count)
            .filter(|&total| total <= MAX_FUNCTION_LOCALS)
            .ok_or_else(|| Error::malformed("Too many locals", offset).with_value(u64::from(count)))?;
        Ok(LocalEntry {
            count,
            value_type: read_value_type(input)?,
        })
    })?;
    let body = FunctionBody { locals, size };
    trace!(
        "function body {} at {:#x}, {} bytes of code",
        index,
        code.position(),
        code.remaining()
    );

    visitor.function_body(index, &body, &mut code)?;
    visitor.function_body_end(&body)
}
