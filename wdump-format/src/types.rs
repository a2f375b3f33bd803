// WDUMP - wdump-format
// Module: Core Type Definitions
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Type and section codes of the MVP binary format.

use core::fmt;

use alloc::vec::Vec;

use crate::binary;

/// A value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueType {
    /// 32-bit integer
    I32 = binary::I32_TYPE,
    /// 64-bit integer
    I64 = binary::I64_TYPE,
    /// 32-bit float
    F32 = binary::F32_TYPE,
    /// 64-bit float
    F64 = binary::F64_TYPE,
}

impl ValueType {
    /// Convert a type byte to a value type.
    pub const fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            binary::I32_TYPE => Some(Self::I32),
            binary::I64_TYPE => Some(Self::I64),
            binary::F32_TYPE => Some(Self::F32),
            binary::F64_TYPE => Some(Self::F64),
            _ => None,
        }
    }

    /// Text-format name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A raw type byte as it appears in the binary.
///
/// This is the value types plus the three codes that only appear in special
/// positions: `anyfunc` as table element type, `func` as a type form and
/// `empty` as a block signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    /// A value type
    Value(ValueType),
    /// `anyfunc` (0x70)
    AnyFunc,
    /// `func` (0x60)
    Func,
    /// `empty` (0x40)
    Empty,
}

impl TypeCode {
    /// Convert a type byte to a type code.
    pub const fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            binary::ANYFUNC_TYPE => Some(Self::AnyFunc),
            binary::FUNC_TYPE => Some(Self::Func),
            binary::EMPTY_BLOCK_TYPE => Some(Self::Empty),
            _ => match ValueType::from_u8(byte) {
                Some(value) => Some(Self::Value(value)),
                None => None,
            },
        }
    }

    /// The byte this code is stored as.
    pub const fn byte(self) -> u8 {
        match self {
            Self::Value(value) => value as u8,
            Self::AnyFunc => binary::ANYFUNC_TYPE,
            Self::Func => binary::FUNC_TYPE,
            Self::Empty => binary::EMPTY_BLOCK_TYPE,
        }
    }

    /// Text-format name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Value(value) => value.name(),
            Self::AnyFunc => "anyfunc",
            Self::Func => "func",
            Self::Empty => "empty",
        }
    }
}

/// Standard section codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum SectionCode {
    /// Custom section (0)
    Custom   = binary::CUSTOM_SECTION_ID,
    /// Type section (1)
    Type     = binary::TYPE_SECTION_ID,
    /// Import section (2)
    Import   = binary::IMPORT_SECTION_ID,
    /// Function section (3)
    Function = binary::FUNCTION_SECTION_ID,
    /// Table section (4)
    Table    = binary::TABLE_SECTION_ID,
    /// Memory section (5)
    Memory   = binary::MEMORY_SECTION_ID,
    /// Global section (6)
    Global   = binary::GLOBAL_SECTION_ID,
    /// Export section (7)
    Export   = binary::EXPORT_SECTION_ID,
    /// Start section (8)
    Start    = binary::START_SECTION_ID,
    /// Element section (9)
    Element  = binary::ELEMENT_SECTION_ID,
    /// Code section (10)
    Code     = binary::CODE_SECTION_ID,
    /// Data section (11)
    Data     = binary::DATA_SECTION_ID,
}

impl SectionCode {
    /// Convert a u8 to a `SectionCode`
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            binary::CUSTOM_SECTION_ID => Some(Self::Custom),
            binary::TYPE_SECTION_ID => Some(Self::Type),
            binary::IMPORT_SECTION_ID => Some(Self::Import),
            binary::FUNCTION_SECTION_ID => Some(Self::Function),
            binary::TABLE_SECTION_ID => Some(Self::Table),
            binary::MEMORY_SECTION_ID => Some(Self::Memory),
            binary::GLOBAL_SECTION_ID => Some(Self::Global),
            binary::EXPORT_SECTION_ID => Some(Self::Export),
            binary::START_SECTION_ID => Some(Self::Start),
            binary::ELEMENT_SECTION_ID => Some(Self::Element),
            binary::CODE_SECTION_ID => Some(Self::Code),
            binary::DATA_SECTION_ID => Some(Self::Data),
            _ => None,
        }
    }

    /// Lower-case section name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::Type => "type",
            Self::Import => "import",
            Self::Function => "function",
            Self::Table => "table",
            Self::Memory => "memory",
            Self::Global => "global",
            Self::Export => "export",
            Self::Start => "start",
            Self::Element => "element",
            Self::Code => "code",
            Self::Data => "data",
        }
    }
}

impl fmt::Display for SectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of an imported or exported entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExternalKind {
    /// Function (0)
    Function = 0,
    /// Table (1)
    Table    = 1,
    /// Memory (2)
    Memory   = 2,
    /// Global (3)
    Global   = 3,
}

impl ExternalKind {
    /// Convert a kind byte.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Function),
            1 => Some(Self::Table),
            2 => Some(Self::Memory),
            3 => Some(Self::Global),
            _ => None,
        }
    }

    /// Text-format keyword.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Function => "func",
            Self::Table => "table",
            Self::Memory => "memory",
            Self::Global => "global",
        }
    }
}

/// Initial size and optional maximum of a table or memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizableLimits {
    /// Initial size
    pub initial: u32,
    /// Maximum size, present when the has-max flag is set
    pub maximum: Option<u32>,
}

/// A function signature.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionType {
    /// Parameter types in order
    pub params: Vec<ValueType>,
    /// Single optional result
    pub result: Option<ValueType>,
}

/// Type of a global variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalType {
    /// Content type
    pub content_type: ValueType,
    /// Whether the global is mutable
    pub mutable:      bool,
}

/// Type of a table; the element type is always `anyfunc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableType {
    /// Size limits, in elements
    pub limits: ResizableLimits,
}

/// Type of a linear memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryType {
    /// Size limits, in 64 KiB pages
    pub limits: ResizableLimits,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes() {
        assert_eq!(TypeCode::from_u8(0x7F), Some(TypeCode::Value(ValueType::I32)));
        assert_eq!(TypeCode::from_u8(0x70), Some(TypeCode::AnyFunc));
        assert_eq!(TypeCode::from_u8(0x40), Some(TypeCode::Empty));
        assert_eq!(TypeCode::from_u8(0x7B), None);
        assert_eq!(TypeCode::Value(ValueType::F64).byte(), 0x7C);
        assert_eq!(TypeCode::AnyFunc.name(), "anyfunc");
    }

    #[test]
    fn test_section_codes() {
        for code in 0..=11u8 {
            assert_eq!(SectionCode::from_u8(code).map(|c| c as u8), Some(code));
        }
        assert_eq!(SectionCode::from_u8(12), None);
        assert_eq!(SectionCode::Element.to_string(), "element");
    }

    #[test]
    fn test_external_kinds() {
        assert_eq!(ExternalKind::from_u8(3), Some(ExternalKind::Global));
        assert_eq!(ExternalKind::from_u8(4), None);
        assert_eq!(ExternalKind::Function.name(), "func");
    }
}
