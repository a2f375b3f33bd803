// WDUMP - wdump-printer
// Module: Expression Printer
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! One-instruction-per-line printing of function bodies.
//!
//! Printing is also where structured control flow gets its only check:
//! `block`, `loop` and `if` open a level, `else` sits one level out, and
//! `end` closes a level. The `end` seen at depth 0 terminates the body.

use core::fmt::Write;

use log::trace;
use wdump_decoder::{Immediate, Instruction};
use wdump_error::{Error, Result};
use wdump_format::OpCode;

use crate::{
    printing::{block_signature_name, f32_text, f64_text},
    sexpr::SexprWriter,
};

/// Prints the instructions of one function body.
#[derive(Debug, Clone)]
pub struct ExprPrinter {
    base:     usize,
    depth:    usize,
    finished: bool,
    strict:   bool,
}

impl ExprPrinter {
    /// Start a body whose instructions are indented at `base`.
    ///
    /// With `strict` unset, stray `end`/`else` and instructions after the
    /// body's final `end` are printed at depth 0 instead of failing.
    pub fn new(base: usize, strict: bool) -> Self {
        Self {
            base,
            depth: 0,
            finished: false,
            strict,
        }
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// True once the body's final `end` was printed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Print one instruction on its own line.
    pub fn print<W: Write>(
        &mut self,
        out: &mut SexprWriter<W>,
        instruction: &Instruction,
    ) -> Result<()> {
        if self.finished && self.strict {
            return Err(Error::unbalanced_nesting("Instruction after the end of the function body")
                .at(instruction.offset));
        }

        match instruction.op {
            op if op.opens_block() => {
                self.line(out, instruction)?;
                self.depth += 1;
            }
            OpCode::Else => {
                if self.depth == 0 {
                    if self.strict {
                        return Err(Error::unbalanced_nesting("else outside of if")
                            .at(instruction.offset));
                    }
                    self.line(out, instruction)?;
                } else {
                    self.depth -= 1;
                    self.line(out, instruction)?;
                    self.depth += 1;
                }
            }
            OpCode::End => {
                if self.depth > 0 {
                    self.depth -= 1;
                } else {
                    self.finished = true;
                }
                self.line(out, instruction)?;
            }
            _ => self.line(out, instruction)?,
        }
        trace!("{:#x}: {} at depth {}", instruction.offset, instruction.op, self.depth);
        Ok(())
    }

    /// Close the body, restoring the writer's indentation.
    ///
    /// In strict mode a body left with open constructs, or without its final
    /// `end`, fails with `UnbalancedNesting`.
    pub fn finish<W: Write>(self, out: &mut SexprWriter<W>) -> Result<()> {
        out.set_indent(self.base);
        if self.strict {
            if self.depth > 0 {
                return Err(Error::unbalanced_nesting("Function body ends inside a block")
                    .with_value(self.depth as u64));
            }
            if !self.finished {
                return Err(Error::unbalanced_nesting("Function body is missing its final end"));
            }
        }
        Ok(())
    }

    fn line<W: Write>(&self, out: &mut SexprWriter<W>, instruction: &Instruction) -> Result<()> {
        out.set_indent(self.base + self.depth);
        out.fresh_line()?;
        out.atom(instruction.op.mnemonic())?;
        immediates(out, instruction)
    }
}

fn immediates<W: Write>(out: &mut SexprWriter<W>, instruction: &Instruction) -> Result<()> {
    match &instruction.immediate {
        Immediate::None => Ok(()),
        Immediate::Index(index) => out.atom(index),
        Immediate::I32(value) => out.atom(value),
        Immediate::I64(value) => out.atom(value),
        Immediate::F32(bits) => out.atom(f32_text(*bits)),
        Immediate::F64(bits) => out.atom(f64_text(*bits)),
        Immediate::Memory { flags, offset } => {
            out.atom(flags)?;
            out.atom(offset)
        }
        Immediate::Block(signature) => {
            // Signature byte follows the opcode byte
            match block_signature_name(*signature, instruction.offset + 1)? {
                Some(name) => out.atom(name),
                None => Ok(()),
            }
        }
        Immediate::BranchTable { targets, default } => {
            for target in targets {
                out.atom(target)?;
            }
            out.atom(default)
        }
        Immediate::CallIndirect { type_index } => out.list("type", type_index),
    }
}
