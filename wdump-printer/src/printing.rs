// WDUMP - wdump-printer
// Module: Entity Rendering
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Text rendering of module entries.
//!
//! Every function writes one entry at the writer's current position; callers
//! are responsible for starting a fresh line first.

use alloc::{format, string::String};
use core::fmt::Write;

use wdump_error::{Error, Result};
use wdump_format::{
    DataSegment, ElementEntry, ExportEntry, FunctionBody, FunctionType, GlobalType, ImportEntry,
    ImportKind, InitExpr, MemoryType, ResizableLimits, TableType, TypeCode,
};

use crate::sexpr::SexprWriter;

const F32_PAYLOAD_MASK: u32 = 0x007F_FFFF;
const F32_CANONICAL_NAN: u32 = 0x0040_0000;
const F64_PAYLOAD_MASK: u64 = 0x000F_FFFF_FFFF_FFFF;
const F64_CANONICAL_NAN: u64 = 0x0008_0000_0000_0000;

/// Render `f32` bits: shortest round-trip decimal, `inf`, `nan` or
/// `nan:0x<payload>`, with a leading `-` when the sign bit is set.
pub fn f32_text(bits: u32) -> String {
    let value = f32::from_bits(bits);
    if value.is_nan() {
        nan_text(bits >> 31 != 0, u64::from(bits & F32_PAYLOAD_MASK), u64::from(F32_CANONICAL_NAN))
    } else {
        format!("{}", value)
    }
}

/// Render `f64` bits the same way as [`f32_text`].
pub fn f64_text(bits: u64) -> String {
    let value = f64::from_bits(bits);
    if value.is_nan() {
        nan_text(bits >> 63 != 0, bits & F64_PAYLOAD_MASK, F64_CANONICAL_NAN)
    } else {
        format!("{}", value)
    }
}

fn nan_text(negative: bool, payload: u64, canonical: u64) -> String {
    let sign = if negative { "-" } else { "" };
    if payload == canonical {
        format!("{}nan", sign)
    } else {
        format!("{}nan:{:#x}", sign, payload)
    }
}

/// Name of a block signature, `None` for the empty signature.
///
/// Anything but a value type or `empty` fails with `InvalidBlockSignature`
/// reported at `offset`.
pub fn block_signature_name(byte: u8, offset: usize) -> Result<Option<&'static str>> {
    match TypeCode::from_u8(byte) {
        Some(TypeCode::Value(value_type)) => Ok(Some(value_type.name())),
        Some(TypeCode::Empty) => Ok(None),
        _ => Err(Error::invalid_block_signature(byte, offset)),
    }
}

/// `(func (param ..) (result ..))`
pub fn function_type<W: Write>(out: &mut SexprWriter<W>, ty: &FunctionType) -> Result<()> {
    out.open("func")?;
    if !ty.params.is_empty() {
        out.open("param")?;
        for param in &ty.params {
            out.atom(param.name())?;
        }
        out.close()?;
    }
    if let Some(result) = ty.result {
        out.list("result", result.name())?;
    }
    out.close()
}

fn limits<W: Write>(out: &mut SexprWriter<W>, limits: &ResizableLimits) -> Result<()> {
    out.atom(limits.initial)?;
    if let Some(maximum) = limits.maximum {
        out.atom(maximum)?;
    }
    Ok(())
}

/// `(table initial [max] anyfunc)`
pub fn table_type<W: Write>(out: &mut SexprWriter<W>, table: &TableType) -> Result<()> {
    out.open("table")?;
    limits(out, &table.limits)?;
    out.atom(TypeCode::AnyFunc.name())?;
    out.close()
}

/// `(memory initial [max])`
pub fn memory_type<W: Write>(out: &mut SexprWriter<W>, memory: &MemoryType) -> Result<()> {
    out.open("memory")?;
    limits(out, &memory.limits)?;
    out.close()
}

/// `i32` or `(mut i32)`
pub fn global_type<W: Write>(out: &mut SexprWriter<W>, global: &GlobalType) -> Result<()> {
    if global.mutable {
        out.list("mut", global.content_type.name())
    } else {
        out.atom(global.content_type.name())
    }
}

/// A constant expression in parentheses, e.g. `(i32.const 8)`.
pub fn init_expr<W: Write>(out: &mut SexprWriter<W>, expr: &InitExpr) -> Result<()> {
    match *expr {
        InitExpr::GetGlobal(index) => out.list("get_global", index),
        InitExpr::I32Const(value) => out.list("i32.const", value),
        InitExpr::I64Const(value) => out.list("i64.const", value),
        InitExpr::F32Const(bits) => out.list("f32.const", f32_text(bits)),
        InitExpr::F64Const(bits) => out.list("f64.const", f64_text(bits)),
    }
}

/// `(import "module" "field" <payload>)`
pub fn import_entry<W: Write>(out: &mut SexprWriter<W>, entry: &ImportEntry) -> Result<()> {
    out.open("import")?;
    out.string(entry.module.as_bytes())?;
    out.string(entry.field.as_bytes())?;
    match &entry.kind {
        ImportKind::Function(type_index) => out.list("type", type_index)?,
        ImportKind::Table(table) => table_type(out, table)?,
        ImportKind::Memory(memory) => memory_type(out, memory)?,
        ImportKind::Global(global) => {
            out.open("global")?;
            global_type(out, global)?;
            out.close()?;
        }
    }
    out.close()
}

/// `(global <type> <init>)`
pub fn global_entry<W: Write>(
    out: &mut SexprWriter<W>,
    global: &GlobalType,
    init: &InitExpr,
) -> Result<()> {
    out.open("global")?;
    global_type(out, global)?;
    init_expr(out, init)?;
    out.close()
}

/// `(export "field" (kind index))`
pub fn export_entry<W: Write>(out: &mut SexprWriter<W>, entry: &ExportEntry) -> Result<()> {
    out.open("export")?;
    out.string(entry.field.as_bytes())?;
    out.list(entry.kind.name(), entry.index)?;
    out.close()
}

/// `(elem (table N) <offset> functions..)`
pub fn element_entry<W: Write>(out: &mut SexprWriter<W>, entry: &ElementEntry) -> Result<()> {
    out.open("elem")?;
    out.list("table", entry.table_index)?;
    init_expr(out, &entry.offset)?;
    for function in &entry.functions {
        out.atom(function)?;
    }
    out.close()
}

/// `(data (memory N) <offset> "bytes")`
pub fn data_segment<W: Write>(out: &mut SexprWriter<W>, segment: &DataSegment) -> Result<()> {
    out.open("data")?;
    out.list("memory", segment.memory_index)?;
    init_expr(out, &segment.offset)?;
    out.string(&segment.data)?;
    out.close()
}

/// `(local ..)` with every local spelled out, nothing when there are none.
pub fn locals<W: Write>(out: &mut SexprWriter<W>, body: &FunctionBody) -> Result<()> {
    if body.locals.iter().all(|entry| entry.count == 0) {
        return Ok(());
    }
    out.open("local")?;
    for value_type in body.local_types() {
        out.atom(value_type.name())?;
    }
    out.close()
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec};

    use wdump_error::ErrorKind;
    use wdump_format::{ExternalKind, LocalEntry, ValueType};

    use super::*;

    fn render(f: impl FnOnce(&mut SexprWriter<String>) -> Result<()>) -> String {
        let mut writer = SexprWriter::new(String::new());
        f(&mut writer).unwrap();
        writer.into_inner()
    }

    #[test]
    fn test_floats() {
        assert_eq!(f32_text(1.5f32.to_bits()), "1.5");
        assert_eq!(f32_text(0.1f32.to_bits()), "0.1");
        assert_eq!(f32_text((-0.0f32).to_bits()), "-0");
        assert_eq!(f32_text(f32::INFINITY.to_bits()), "inf");
        assert_eq!(f32_text(f32::NEG_INFINITY.to_bits()), "-inf");
        assert_eq!(f32_text(0x7FC0_0000), "nan");
        assert_eq!(f32_text(0xFFC0_0000), "-nan");
        assert_eq!(f32_text(0x7FC0_0001), "nan:0x400001");
        assert_eq!(f64_text(2.5f64.to_bits()), "2.5");
        assert_eq!(f64_text(0x7FF8_0000_0000_0000), "nan");
        assert_eq!(f64_text(0x7FF0_0000_0000_0001), "nan:0x1");
    }

    #[test]
    fn test_block_signature_names() {
        assert_eq!(block_signature_name(0x7F, 0).unwrap(), Some("i32"));
        assert_eq!(block_signature_name(0x7C, 0).unwrap(), Some("f64"));
        assert_eq!(block_signature_name(0x40, 0).unwrap(), None);
        let err = block_signature_name(0x70, 3).unwrap_err();
        assert!(err.is(ErrorKind::InvalidBlockSignature));
        assert_eq!(err.offset, Some(3));
        assert!(block_signature_name(0xFF, 0).is_err());
    }

    #[test]
    fn test_function_types() {
        let ty = FunctionType {
            params: vec![ValueType::I32, ValueType::I32],
            result: Some(ValueType::I32),
        };
        assert_eq!(
            render(|w| function_type(w, &ty)),
            "(func (param i32 i32) (result i32))"
        );
        let empty = FunctionType {
            params: vec![],
            result: None,
        };
        assert_eq!(render(|w| function_type(w, &empty)), "(func)");
    }

    #[test]
    fn test_imports() {
        let table = ImportEntry {
            module: "env".to_string(),
            field:  "t".to_string(),
            kind:   ImportKind::Table(TableType {
                limits: ResizableLimits {
                    initial: 1,
                    maximum: Some(10),
                },
            }),
        };
        assert_eq!(
            render(|w| import_entry(w, &table)),
            "(import \"env\" \"t\" (table 1 10 anyfunc))"
        );
        let global = ImportEntry {
            module: "env".to_string(),
            field:  "g".to_string(),
            kind:   ImportKind::Global(GlobalType {
                content_type: ValueType::I32,
                mutable:      true,
            }),
        };
        assert_eq!(
            render(|w| import_entry(w, &global)),
            "(import \"env\" \"g\" (global (mut i32)))"
        );
    }

    #[test]
    fn test_export_and_elem() {
        let export = ExportEntry {
            field: "add".to_string(),
            kind:  ExternalKind::Function,
            index: 0,
        };
        assert_eq!(render(|w| export_entry(w, &export)), "(export \"add\" (func 0))");
        let elem = ElementEntry {
            table_index: 0,
            offset:      InitExpr::I32Const(0),
            functions:   vec![0, 1],
        };
        assert_eq!(render(|w| element_entry(w, &elem)), "(elem (table 0) (i32.const 0) 0 1)");
    }

    #[test]
    fn test_data_segment() {
        let segment = DataSegment {
            memory_index: 0,
            offset:       InitExpr::I32Const(8),
            data:         b"hi\n".to_vec(),
        };
        assert_eq!(
            render(|w| data_segment(w, &segment)),
            "(data (memory 0) (i32.const 8) \"hi\\0a\")"
        );
    }

    #[test]
    fn test_locals() {
        let body = FunctionBody {
            locals: vec![
                LocalEntry {
                    count:      2,
                    value_type: ValueType::I32,
                },
                LocalEntry {
                    count:      1,
                    value_type: ValueType::F64,
                },
            ],
            size:   0,
        };
        assert_eq!(render(|w| locals(w, &body)), "(local i32 i32 f64)");
        let none = FunctionBody {
            locals: vec![],
            size:   0,
        };
        assert_eq!(render(|w| locals(w, &none)), "");
    }

    #[test]
    fn test_global_with_float_init() {
        let global = GlobalType {
            content_type: ValueType::F32,
            mutable:      false,
        };
        assert_eq!(
            render(|w| global_entry(w, &global, &InitExpr::F32Const(0x7F80_0000))),
            "(global f32 (f32.const inf))"
        );
    }
}
