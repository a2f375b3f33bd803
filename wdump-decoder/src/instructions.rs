// WDUMP - wdump-decoder
// Module: Instruction Decoding
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! WebAssembly instruction handling
//!
//! Instructions are decoded one at a time from a [`BinaryReader`]. The opcode
//! table decides which immediates follow each opcode, so decoding is a single
//! dispatch on [`ImmediateShape`]. Nesting of `block`/`loop`/`if` is not
//! checked here.

use alloc::vec::Vec;

use log::trace;
use wdump_error::{Error, ErrorKind, Result};
use wdump_format::{binary, BinaryReader, ImmediateShape, OpCode};

/// Immediate operands of an instruction.
///
/// The variant is fixed by the opcode's [`ImmediateShape`]. Reserved
/// immediates are validated while decoding and not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Immediate {
    /// No stored immediates
    None,
    /// An index or relative depth
    Index(u32),
    /// `i32.const` value
    I32(i32),
    /// `i64.const` value
    I64(i64),
    /// `f32.const` bits
    F32(u32),
    /// `f64.const` bits
    F64(u64),
    /// Memory access
    Memory {
        /// Alignment flags
        flags:  u32,
        /// Constant offset
        offset: u32,
    },
    /// Raw block signature byte
    Block(u8),
    /// `br_table` operands
    BranchTable {
        /// Relative depths
        targets: Vec<u32>,
        /// Default relative depth
        default: u32,
    },
    /// `call_indirect` signature
    CallIndirect {
        /// Type index
        type_index: u32,
    },
}

/// A decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The opcode
    pub op:        OpCode,
    /// Absolute offset of the opcode byte
    pub offset:    usize,
    /// Its immediates
    pub immediate: Immediate,
}

fn read_reserved(reader: &mut BinaryReader<'_>) -> Result<()> {
    let at = reader.position();
    if reader.read_var_u1()? != 0 {
        return Err(Error::malformed("Reserved immediate must be zero", at));
    }
    Ok(())
}

/// Decode one instruction at the reader's position.
pub fn decode_instruction(reader: &mut BinaryReader<'_>) -> Result<Instruction> {
    let offset = reader.position();
    let op = OpCode::decode(reader.read_u8()?, offset)?;

    let immediate = match op.shape() {
        ImmediateShape::Nullary => Immediate::None,
        ImmediateShape::VarUint32 => Immediate::Index(reader.read_var_u32()?),
        ImmediateShape::VarUint1 => {
            read_reserved(reader)?;
            Immediate::None
        }
        ImmediateShape::VarInt32 => Immediate::I32(reader.read_var_i32()?),
        ImmediateShape::VarInt64 => Immediate::I64(reader.read_var_i64()?),
        ImmediateShape::Float32 => Immediate::F32(reader.read_u32_le()?),
        ImmediateShape::Float64 => Immediate::F64(reader.read_u64_le()?),
        ImmediateShape::Memory => Immediate::Memory {
            flags:  reader.read_var_u32()?,
            offset: reader.read_var_u32()?,
        },
        ImmediateShape::BlockSignature => Immediate::Block(reader.read_u8()?),
        ImmediateShape::BranchTable => {
            let count = reader.read_var_u32()?;
            // Every target takes at least one byte
            let mut targets = Vec::with_capacity((count as usize).min(reader.remaining()));
            for _ in 0..count {
                targets.push(reader.read_var_u32()?);
            }
            Immediate::BranchTable {
                targets,
                default: reader.read_var_u32()?,
            }
        }
        ImmediateShape::CallIndirect => {
            let type_index = reader.read_var_u32()?;
            read_reserved(reader)?;
            Immediate::CallIndirect { type_index }
        }
    };

    trace!("{:#x}: {} {:?}", offset, op, immediate);
    Ok(Instruction { op, offset, immediate })
}

/// Running out of input at the window limit means the instruction crosses
/// the stream boundary.
fn is_cut_off(err: &Error, end_offset: usize) -> bool {
    matches!(err.kind(), ErrorKind::BadNumber | ErrorKind::UnexpectedEnd)
        && err.offset == Some(end_offset)
}

/// Where an instruction starting at `start` ends when read without the
/// boundary, or where reading it fails.
fn overrun_end(full: &BinaryReader<'_>, start: usize, end_offset: usize) -> usize {
    let mut rest = full.clone();
    if rest.skip_to(start).is_err() {
        return end_offset;
    }
    match decode_instruction(&mut rest) {
        Ok(_) => rest.position(),
        Err(err) => err.offset.map_or(end_offset, |offset| offset.max(end_offset)),
    }
}

/// Streaming decoder bounded by byte offset.
pub struct InstructionDecoder;

impl InstructionDecoder {
    /// Decode instructions until the reader sits exactly at `end_offset`,
    /// handing each one to `handler`.
    ///
    /// Instructions are read from a window ending at `end_offset`. Fails with
    /// `UnalignedStreamEnd` if `end_offset` lies outside the reader, or if an
    /// instruction runs past `end_offset`. Errors returned by `handler` abort decoding and are
    /// passed through unchanged.
    pub fn decode<F>(reader: &mut BinaryReader<'_>, end_offset: usize, mut handler: F) -> Result<()>
    where
        F: FnMut(&Instruction) -> Result<()>,
    {
        if end_offset < reader.position() || end_offset > reader.end() {
            return Err(Error::unaligned_stream_end(end_offset, reader.position()));
        }

        let full = reader.clone();
        let mut window = reader.sub_reader(end_offset - reader.position())?;
        while !window.is_at_end() {
            let start = window.position();
            let instruction = decode_instruction(&mut window).map_err(|err| {
                if is_cut_off(&err, end_offset) {
                    Error::unaligned_stream_end(end_offset, overrun_end(&full, start, end_offset))
                } else {
                    err
                }
            })?;
            handler(&instruction)?;
        }
        Ok(())
    }

    /// Decode instructions up to and including the first `end`.
    pub fn decode_until_end<F>(reader: &mut BinaryReader<'_>, mut handler: F) -> Result<()>
    where
        F: FnMut(&Instruction) -> Result<()>,
    {
        loop {
            let instruction = decode_instruction(reader)?;
            handler(&instruction)?;
            if instruction.op == OpCode::End {
                return Ok(());
            }
        }
    }

    /// Decode a bounded stream into a vector.
    pub fn decode_all(reader: &mut BinaryReader<'_>, end_offset: usize) -> Result<Vec<Instruction>> {
        let mut instructions = Vec::new();
        Self::decode(reader, end_offset, |instruction| {
            instructions.push(instruction.clone());
            Ok(())
        })?;
        Ok(instructions)
    }
}

/// Encode a single instruction in its canonical binary form.
pub fn encode_instruction(instruction: &Instruction) -> Result<Vec<u8>> {
    let op = instruction.op;
    let mut bytes = alloc::vec![op.byte()];

    match (op.shape(), &instruction.immediate) {
        (ImmediateShape::Nullary, Immediate::None) => {}
        (ImmediateShape::VarUint32, Immediate::Index(index)) => {
            bytes.extend_from_slice(&binary::write_var_u32(*index));
        }
        (ImmediateShape::VarUint1, Immediate::None) => bytes.push(0),
        (ImmediateShape::VarInt32, Immediate::I32(value)) => {
            bytes.extend_from_slice(&binary::write_var_i32(*value));
        }
        (ImmediateShape::VarInt64, Immediate::I64(value)) => {
            bytes.extend_from_slice(&binary::write_var_i64(*value));
        }
        (ImmediateShape::Float32, Immediate::F32(bits)) => bytes.extend_from_slice(&bits.to_le_bytes()),
        (ImmediateShape::Float64, Immediate::F64(bits)) => bytes.extend_from_slice(&bits.to_le_bytes()),
        (ImmediateShape::Memory, Immediate::Memory { flags, offset }) => {
            bytes.extend_from_slice(&binary::write_var_u32(*flags));
            bytes.extend_from_slice(&binary::write_var_u32(*offset));
        }
        (ImmediateShape::BlockSignature, Immediate::Block(signature)) => bytes.push(*signature),
        (ImmediateShape::BranchTable, Immediate::BranchTable { targets, default }) => {
            bytes.extend_from_slice(&binary::write_var_u32(targets.len() as u32));
            for target in targets {
                bytes.extend_from_slice(&binary::write_var_u32(*target));
            }
            bytes.extend_from_slice(&binary::write_var_u32(*default));
        }
        (ImmediateShape::CallIndirect, Immediate::CallIndirect { type_index }) => {
            bytes.extend_from_slice(&binary::write_var_u32(*type_index));
            bytes.push(0);
        }
        _ => {
            return Err(Error::malformed(
                "Immediate does not match the opcode",
                instruction.offset,
            ))
        }
    }
    Ok(bytes)
}

/// Encode a sequence of instructions
pub fn encode_instructions(instructions: &[Instruction]) -> Result<Vec<u8>> {
    let mut result = Vec::new();
    for instruction in instructions {
        result.extend_from_slice(&encode_instruction(instruction)?);
    }
    Ok(result)
}
