// WDUMP - wdump-format
// Module: Opcode Table
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! The MVP opcode table.
//!
//! Every opcode is declared exactly once in the table below. The row gives
//! the byte, the text-format mnemonic and the shape of the immediates that
//! follow the opcode in the binary. `OpCode`, `from_u8`, `mnemonic`, `shape`
//! and `ALL` are all generated from these rows, so the decoder and the
//! printer always agree on the layout of an instruction.

use core::fmt;

use wdump_error::{Error, Result};

/// Layout of the immediates that follow an opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImmediateShape {
    /// No immediates
    Nullary,
    /// One `varuint32` (index or relative depth)
    VarUint32,
    /// One reserved `varuint1`, must be zero
    VarUint1,
    /// One `varint32`
    VarInt32,
    /// One `varint64`
    VarInt64,
    /// Four little-endian bytes of an IEEE-754 single
    Float32,
    /// Eight little-endian bytes of an IEEE-754 double
    Float64,
    /// `varuint32` flags (alignment) then `varuint32` offset
    Memory,
    /// One raw block signature byte
    BlockSignature,
    /// `varuint32` count, that many `varuint32` targets, `varuint32` default
    BranchTable,
    /// `varuint32` type index then a reserved `varuint1`
    CallIndirect,
}

macro_rules! opcodes {
    ($( $name:ident = $byte:literal, $mnemonic:literal, $shape:ident; )*) => {
        /// A single-byte instruction tag.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum OpCode {
            $(
                #[doc = concat!("`", $mnemonic, "`")]
                $name = $byte,
            )*
        }

        impl OpCode {
            /// Every valid opcode, in byte order.
            pub const ALL: &'static [OpCode] = &[$(OpCode::$name,)*];

            /// Look up the opcode for a byte.
            #[must_use]
            pub const fn from_u8(byte: u8) -> Option<Self> {
                match byte {
                    $($byte => Some(Self::$name),)*
                    _ => None,
                }
            }

            /// Text-format mnemonic.
            #[must_use]
            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $(Self::$name => $mnemonic,)*
                }
            }

            /// Layout of the immediates following this opcode.
            #[must_use]
            pub const fn shape(self) -> ImmediateShape {
                match self {
                    $(Self::$name => ImmediateShape::$shape,)*
                }
            }
        }
    };
}

opcodes! {
    Unreachable       = 0x00, "unreachable",          Nullary;
    Nop               = 0x01, "nop",                  Nullary;
    Block             = 0x02, "block",                BlockSignature;
    Loop              = 0x03, "loop",                 BlockSignature;
    If                = 0x04, "if",                   BlockSignature;
    Else              = 0x05, "else",                 Nullary;
    End               = 0x0B, "end",                  Nullary;
    Br                = 0x0C, "br",                   VarUint32;
    BrIf              = 0x0D, "br_if",                VarUint32;
    BrTable           = 0x0E, "br_table",             BranchTable;
    Return            = 0x0F, "return",               Nullary;
    Call              = 0x10, "call",                 VarUint32;
    CallIndirect      = 0x11, "call_indirect",        CallIndirect;
    Drop              = 0x1A, "drop",                 Nullary;
    Select            = 0x1B, "select",               Nullary;
    GetLocal          = 0x20, "get_local",            VarUint32;
    SetLocal          = 0x21, "set_local",            VarUint32;
    TeeLocal          = 0x22, "tee_local",            VarUint32;
    GetGlobal         = 0x23, "get_global",           VarUint32;
    SetGlobal         = 0x24, "set_global",           VarUint32;
    I32Load           = 0x28, "i32.load",             Memory;
    I64Load           = 0x29, "i64.load",             Memory;
    F32Load           = 0x2A, "f32.load",             Memory;
    F64Load           = 0x2B, "f64.load",             Memory;
    I32Load8S         = 0x2C, "i32.load8_s",          Memory;
    I32Load8U         = 0x2D, "i32.load8_u",          Memory;
    I32Load16S        = 0x2E, "i32.load16_s",         Memory;
    I32Load16U        = 0x2F, "i32.load16_u",         Memory;
    I64Load8S         = 0x30, "i64.load8_s",          Memory;
    I64Load8U         = 0x31, "i64.load8_u",          Memory;
    I64Load16S        = 0x32, "i64.load16_s",         Memory;
    I64Load16U        = 0x33, "i64.load16_u",         Memory;
    I64Load32S        = 0x34, "i64.load32_s",         Memory;
    I64Load32U        = 0x35, "i64.load32_u",         Memory;
    I32Store          = 0x36, "i32.store",            Memory;
    I64Store          = 0x37, "i64.store",            Memory;
    F32Store          = 0x38, "f32.store",            Memory;
    F64Store          = 0x39, "f64.store",            Memory;
    I32Store8         = 0x3A, "i32.store8",           Memory;
    I32Store16        = 0x3B, "i32.store16",          Memory;
    I64Store8         = 0x3C, "i64.store8",           Memory;
    I64Store16        = 0x3D, "i64.store16",          Memory;
    I64Store32        = 0x3E, "i64.store32",          Memory;
    CurrentMemory     = 0x3F, "current_memory",       VarUint1;
    GrowMemory        = 0x40, "grow_memory",          VarUint1;
    I32Const          = 0x41, "i32.const",            VarInt32;
    I64Const          = 0x42, "i64.const",            VarInt64;
    F32Const          = 0x43, "f32.const",            Float32;
    F64Const          = 0x44, "f64.const",            Float64;
    I32Eqz            = 0x45, "i32.eqz",              Nullary;
    I32Eq             = 0x46, "i32.eq",               Nullary;
    I32Ne             = 0x47, "i32.ne",               Nullary;
    I32LtS            = 0x48, "i32.lt_s",             Nullary;
    I32LtU            = 0x49, "i32.lt_u",             Nullary;
    I32GtS            = 0x4A, "i32.gt_s",             Nullary;
    I32GtU            = 0x4B, "i32.gt_u",             Nullary;
    I32LeS            = 0x4C, "i32.le_s",             Nullary;
    I32LeU            = 0x4D, "i32.le_u",             Nullary;
    I32GeS            = 0x4E, "i32.ge_s",             Nullary;
    I32GeU            = 0x4F, "i32.ge_u",             Nullary;
    I64Eqz            = 0x50, "i64.eqz",              Nullary;
    I64Eq             = 0x51, "i64.eq",               Nullary;
    I64Ne             = 0x52, "i64.ne",               Nullary;
    I64LtS            = 0x53, "i64.lt_s",             Nullary;
    I64LtU            = 0x54, "i64.lt_u",             Nullary;
    I64GtS            = 0x55, "i64.gt_s",             Nullary;
    I64GtU            = 0x56, "i64.gt_u",             Nullary;
    I64LeS            = 0x57, "i64.le_s",             Nullary;
    I64LeU            = 0x58, "i64.le_u",             Nullary;
    I64GeS            = 0x59, "i64.ge_s",             Nullary;
    I64GeU            = 0x5A, "i64.ge_u",             Nullary;
    F32Eq             = 0x5B, "f32.eq",               Nullary;
    F32Ne             = 0x5C, "f32.ne",               Nullary;
    F32Lt             = 0x5D, "f32.lt",               Nullary;
    F32Gt             = 0x5E, "f32.gt",               Nullary;
    F32Le             = 0x5F, "f32.le",               Nullary;
    F32Ge             = 0x60, "f32.ge",               Nullary;
    F64Eq             = 0x61, "f64.eq",               Nullary;
    F64Ne             = 0x62, "f64.ne",               Nullary;
    F64Lt             = 0x63, "f64.lt",               Nullary;
    F64Gt             = 0x64, "f64.gt",               Nullary;
    F64Le             = 0x65, "f64.le",               Nullary;
    F64Ge             = 0x66, "f64.ge",               Nullary;
    I32Clz            = 0x67, "i32.clz",              Nullary;
    I32Ctz            = 0x68, "i32.ctz",              Nullary;
    I32Popcnt         = 0x69, "i32.popcnt",           Nullary;
    I32Add            = 0x6A, "i32.add",              Nullary;
    I32Sub            = 0x6B, "i32.sub",              Nullary;
    I32Mul            = 0x6C, "i32.mul",              Nullary;
    I32DivS           = 0x6D, "i32.div_s",            Nullary;
    I32DivU           = 0x6E, "i32.div_u",            Nullary;
    I32RemS           = 0x6F, "i32.rem_s",            Nullary;
    I32RemU           = 0x70, "i32.rem_u",            Nullary;
    I32And            = 0x71, "i32.and",              Nullary;
    I32Or             = 0x72, "i32.or",               Nullary;
    I32Xor            = 0x73, "i32.xor",              Nullary;
    I32Shl            = 0x74, "i32.shl",              Nullary;
    I32ShrS           = 0x75, "i32.shr_s",            Nullary;
    I32ShrU           = 0x76, "i32.shr_u",            Nullary;
    I32Rotl           = 0x77, "i32.rotl",             Nullary;
    I32Rotr           = 0x78, "i32.rotr",             Nullary;
    I64Clz            = 0x79, "i64.clz",              Nullary;
    I64Ctz            = 0x7A, "i64.ctz",              Nullary;
    I64Popcnt         = 0x7B, "i64.popcnt",           Nullary;
    I64Add            = 0x7C, "i64.add",              Nullary;
    I64Sub            = 0x7D, "i64.sub",              Nullary;
    I64Mul            = 0x7E, "i64.mul",              Nullary;
    I64DivS           = 0x7F, "i64.div_s",            Nullary;
    I64DivU           = 0x80, "i64.div_u",            Nullary;
    I64RemS           = 0x81, "i64.rem_s",            Nullary;
    I64RemU           = 0x82, "i64.rem_u",            Nullary;
    I64And            = 0x83, "i64.and",              Nullary;
    I64Or             = 0x84, "i64.or",               Nullary;
    I64Xor            = 0x85, "i64.xor",              Nullary;
    I64Shl            = 0x86, "i64.shl",              Nullary;
    I64ShrS           = 0x87, "i64.shr_s",            Nullary;
    I64ShrU           = 0x88, "i64.shr_u",            Nullary;
    I64Rotl           = 0x89, "i64.rotl",             Nullary;
    I64Rotr           = 0x8A, "i64.rotr",             Nullary;
    F32Abs            = 0x8B, "f32.abs",              Nullary;
    F32Neg            = 0x8C, "f32.neg",              Nullary;
    F32Ceil           = 0x8D, "f32.ceil",             Nullary;
    F32Floor          = 0x8E, "f32.floor",            Nullary;
    F32Trunc          = 0x8F, "f32.trunc",            Nullary;
    F32Nearest        = 0x90, "f32.nearest",          Nullary;
    F32Sqrt           = 0x91, "f32.sqrt",             Nullary;
    F32Add            = 0x92, "f32.add",              Nullary;
    F32Sub            = 0x93, "f32.sub",              Nullary;
    F32Mul            = 0x94, "f32.mul",              Nullary;
    F32Div            = 0x95, "f32.div",              Nullary;
    F32Min            = 0x96, "f32.min",              Nullary;
    F32Max            = 0x97, "f32.max",              Nullary;
    F32Copysign       = 0x98, "f32.copysign",         Nullary;
    F64Abs            = 0x99, "f64.abs",              Nullary;
    F64Neg            = 0x9A, "f64.neg",              Nullary;
    F64Ceil           = 0x9B, "f64.ceil",             Nullary;
    F64Floor          = 0x9C, "f64.floor",            Nullary;
    F64Trunc          = 0x9D, "f64.trunc",            Nullary;
    F64Nearest        = 0x9E, "f64.nearest",          Nullary;
    F64Sqrt           = 0x9F, "f64.sqrt",             Nullary;
    F64Add            = 0xA0, "f64.add",              Nullary;
    F64Sub            = 0xA1, "f64.sub",              Nullary;
    F64Mul            = 0xA2, "f64.mul",              Nullary;
    F64Div            = 0xA3, "f64.div",              Nullary;
    F64Min            = 0xA4, "f64.min",              Nullary;
    F64Max            = 0xA5, "f64.max",              Nullary;
    F64Copysign       = 0xA6, "f64.copysign",         Nullary;
    I32WrapI64        = 0xA7, "i32.wrap/i64",         Nullary;
    I32TruncSF32      = 0xA8, "i32.trunc_s/f32",      Nullary;
    I32TruncUF32      = 0xA9, "i32.trunc_u/f32",      Nullary;
    I32TruncSF64      = 0xAA, "i32.trunc_s/f64",      Nullary;
    I32TruncUF64      = 0xAB, "i32.trunc_u/f64",      Nullary;
    I64ExtendSI32     = 0xAC, "i64.extend_s/i32",     Nullary;
    I64ExtendUI32     = 0xAD, "i64.extend_u/i32",     Nullary;
    I64TruncSF32      = 0xAE, "i64.trunc_s/f32",      Nullary;
    I64TruncUF32      = 0xAF, "i64.trunc_u/f32",      Nullary;
    I64TruncSF64      = 0xB0, "i64.trunc_s/f64",      Nullary;
    I64TruncUF64      = 0xB1, "i64.trunc_u/f64",      Nullary;
    F32ConvertSI32    = 0xB2, "f32.convert_s/i32",    Nullary;
    F32ConvertUI32    = 0xB3, "f32.convert_u/i32",    Nullary;
    F32ConvertSI64    = 0xB4, "f32.convert_s/i64",    Nullary;
    F32ConvertUI64    = 0xB5, "f32.convert_u/i64",    Nullary;
    F32DemoteF64      = 0xB6, "f32.demote/f64",       Nullary;
    F64ConvertSI32    = 0xB7, "f64.convert_s/i32",    Nullary;
    F64ConvertUI32    = 0xB8, "f64.convert_u/i32",    Nullary;
    F64ConvertSI64    = 0xB9, "f64.convert_s/i64",    Nullary;
    F64ConvertUI64    = 0xBA, "f64.convert_u/i64",    Nullary;
    F64PromoteF32     = 0xBB, "f64.promote/f32",      Nullary;
    I32ReinterpretF32 = 0xBC, "i32.reinterpret/f32",  Nullary;
    I64ReinterpretF64 = 0xBD, "i64.reinterpret/f64",  Nullary;
    F32ReinterpretI32 = 0xBE, "f32.reinterpret/i32",  Nullary;
    F64ReinterpretI64 = 0xBF, "f64.reinterpret/i64",  Nullary;
}

impl OpCode {
    /// Decode the opcode byte found at `offset`.
    pub fn decode(byte: u8, offset: usize) -> Result<Self> {
        Self::from_u8(byte).ok_or_else(|| Error::unknown_opcode(byte, offset))
    }

    /// The opcode byte.
    #[must_use]
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Whether this opcode opens a construct closed by `end`.
    #[must_use]
    pub const fn opens_block(self) -> bool {
        matches!(self, Self::Block | Self::Loop | Self::If)
    }

    /// Whether this opcode may appear in an initialization expression.
    #[must_use]
    pub const fn is_constant_expr(self) -> bool {
        matches!(
            self,
            Self::GetGlobal | Self::I32Const | Self::I64Const | Self::F32Const | Self::F64Const
        )
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
