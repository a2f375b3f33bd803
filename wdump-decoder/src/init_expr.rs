// WDUMP - wdump-decoder
// Module: Initialization Expressions
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Decoding of constant initialization expressions.

use wdump_error::{Error, Result};
use wdump_format::{BinaryReader, InitExpr, OpCode};

use crate::instructions::{Immediate, Instruction, InstructionDecoder};

fn to_init_expr(instruction: &Instruction) -> Option<InitExpr> {
    if !instruction.op.is_constant_expr() {
        return None;
    }
    // Each constant opcode has its own immediate shape
    match instruction.immediate {
        Immediate::Index(index) => Some(InitExpr::GetGlobal(index)),
        Immediate::I32(value) => Some(InitExpr::I32Const(value)),
        Immediate::I64(value) => Some(InitExpr::I64Const(value)),
        Immediate::F32(bits) => Some(InitExpr::F32Const(bits)),
        Immediate::F64(bits) => Some(InitExpr::F64Const(bits)),
        _ => None,
    }
}

/// Read one constant instruction followed by `end`.
///
/// Any other opcode in either position fails with
/// `UnexpectedExpressionOpcode`.
pub fn read_init_expr(reader: &mut BinaryReader<'_>) -> Result<InitExpr> {
    let mut expr = None;
    InstructionDecoder::decode_until_end(reader, |instruction| {
        let unexpected =
            || Error::unexpected_expression_opcode(instruction.op.byte(), instruction.offset);
        match expr {
            None => expr = Some(to_init_expr(instruction).ok_or_else(unexpected)?),
            // The instruction after the constant must be the terminating `end`
            Some(_) if instruction.op != OpCode::End => return Err(unexpected()),
            Some(_) => {}
        }
        Ok(())
    })?;
    // `decode_until_end` only returns after a second instruction, the `end`
    expr.ok_or_else(|| Error::malformed("Empty initialization expression", reader.position()))
}

#[cfg(test)]
mod tests {
    use wdump_error::ErrorKind;

    use super::*;

    fn read(bytes: &[u8]) -> Result<InitExpr> {
        read_init_expr(&mut BinaryReader::new(bytes))
    }

    #[test]
    fn test_constants() {
        assert_eq!(read(&[0x41, 0x08, 0x0B]).unwrap(), InitExpr::I32Const(8));
        assert_eq!(read(&[0x42, 0x7F, 0x0B]).unwrap(), InitExpr::I64Const(-1));
        assert_eq!(read(&[0x23, 0x02, 0x0B]).unwrap(), InitExpr::GetGlobal(2));
        assert_eq!(
            read(&[0x43, 0x00, 0x00, 0x80, 0x3F, 0x0B]).unwrap(),
            InitExpr::F32Const(0x3F80_0000)
        );
        assert_eq!(
            read(&[0x44, 0, 0, 0, 0, 0, 0, 0xF0, 0x3F, 0x0B]).unwrap(),
            InitExpr::F64Const(0x3FF0_0000_0000_0000)
        );
    }

    #[test]
    fn test_call_is_rejected() {
        let err = read(&[0x10, 0x00, 0x0B]).unwrap_err();
        assert!(err.is(ErrorKind::UnexpectedExpressionOpcode));
        assert_eq!(err.value, Some(0x10));
        assert_eq!(err.offset, Some(0));
    }

    #[test]
    fn test_bare_end_is_rejected() {
        let err = read(&[0x0B]).unwrap_err();
        assert!(err.is(ErrorKind::UnexpectedExpressionOpcode));
        assert_eq!(err.value, Some(0x0B));
    }

    #[test]
    fn test_second_constant_is_rejected() {
        let err = read(&[0x41, 0x01, 0x41, 0x02, 0x0B]).unwrap_err();
        assert!(err.is(ErrorKind::UnexpectedExpressionOpcode));
        assert_eq!(err.offset, Some(2));
    }

    #[test]
    fn test_missing_end_is_bad_number() {
        let err = read(&[0x41, 0x01]).unwrap_err();
        assert!(err.is(ErrorKind::BadNumber));
    }
}
