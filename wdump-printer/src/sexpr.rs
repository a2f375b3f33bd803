// WDUMP - wdump-printer
// Module: S-Expression Writer
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Indentation-aware s-expression output.
//!
//! [`SexprWriter`] keeps track of whether the current line is fresh (nothing
//! written yet) and whether the next token needs a separating space. Lines
//! are only broken on request with [`SexprWriter::fresh_line`], so an
//! expression stays on one line unless the caller asks otherwise.

use core::fmt::{self, Write};

use wdump_error::Result;

/// Spaces per indentation level
pub const INDENT_WIDTH: usize = 2;

/// Writes s-expressions into any [`fmt::Write`] sink.
#[derive(Debug)]
pub struct SexprWriter<W: Write> {
    out:          W,
    indent:       usize,
    fresh:        bool,
    needs_space:  bool,
    line_comment: bool,
}

impl<W: Write> SexprWriter<W> {
    /// Create a writer at indentation level 0.
    pub fn new(out: W) -> Self {
        Self {
            out,
            indent: 0,
            fresh: true,
            needs_space: false,
            line_comment: false,
        }
    }

    /// Current indentation level.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Set the indentation used for the next fresh line.
    pub fn set_indent(&mut self, indent: usize) {
        self.indent = indent;
    }

    /// Recover the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write indentation on a fresh line, or a separator after a token.
    fn spacing(&mut self) -> fmt::Result {
        if self.fresh {
            for _ in 0..self.indent * INDENT_WIDTH {
                self.out.write_char(' ')?;
            }
        } else if self.needs_space {
            self.out.write_char(' ')?;
        }
        self.fresh = false;
        self.needs_space = false;
        Ok(())
    }

    /// A line comment swallows the rest of its line.
    fn leave_line_comment(&mut self) -> Result<()> {
        if self.line_comment {
            self.fresh_line()?;
        }
        Ok(())
    }

    /// Start a new line unless the current one is still empty.
    pub fn fresh_line(&mut self) -> Result<()> {
        if !self.fresh {
            self.out.write_char('\n')?;
            self.fresh = true;
            self.needs_space = false;
            self.line_comment = false;
        }
        Ok(())
    }

    /// Write `(head` and indent what follows.
    pub fn open(&mut self, head: &str) -> Result<()> {
        self.leave_line_comment()?;
        self.spacing()?;
        self.out.write_char('(')?;
        self.out.write_str(head)?;
        self.needs_space = true;
        self.indent += 1;
        Ok(())
    }

    /// Write `)` and dedent.
    pub fn close(&mut self) -> Result<()> {
        self.leave_line_comment()?;
        self.indent = self.indent.saturating_sub(1);
        if self.fresh {
            self.spacing()?;
        }
        self.out.write_char(')')?;
        self.needs_space = true;
        Ok(())
    }

    /// Write a bare token.
    pub fn atom(&mut self, token: impl fmt::Display) -> Result<()> {
        self.leave_line_comment()?;
        self.spacing()?;
        write!(self.out, "{}", token)?;
        self.needs_space = true;
        Ok(())
    }

    /// Write `(head token)` on the current line.
    pub fn list(&mut self, head: &str, token: impl fmt::Display) -> Result<()> {
        self.open(head)?;
        self.atom(token)?;
        self.close()
    }

    /// Write a quoted string; see [`escape_bytes`].
    pub fn string(&mut self, bytes: &[u8]) -> Result<()> {
        self.leave_line_comment()?;
        self.spacing()?;
        write!(self.out, "\"{}\"", Escaped(bytes))?;
        self.needs_space = true;
        Ok(())
    }

    /// Write `;; text` on a line of its own.
    pub fn comment(&mut self, text: fmt::Arguments<'_>) -> Result<()> {
        self.fresh_line()?;
        self.spacing()?;
        write!(self.out, ";; {}", text)?;
        self.line_comment = true;
        Ok(())
    }

    /// Write `(; text ;)` on a line of its own.
    pub fn block_comment(&mut self, text: fmt::Arguments<'_>) -> Result<()> {
        self.fresh_line()?;
        self.spacing()?;
        write!(self.out, "(; {} ;)", text)?;
        self.needs_space = true;
        Ok(())
    }
}

/// Displays bytes escaped as by [`escape_bytes`], without quotes.
#[derive(Debug, Clone, Copy)]
pub struct Escaped<'a>(pub &'a [u8]);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        escape_bytes(f, self.0)
    }
}

/// Displays bytes escaped for a string inside a block comment. `;` is
/// escaped as well, so the text can never contain `;)` or `(;`.
#[derive(Debug, Clone, Copy)]
pub struct CommentEscaped<'a>(pub &'a [u8]);

impl fmt::Display for CommentEscaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        escape_where(f, self.0, |byte| byte != b';')
    }
}

/// Escape bytes for a string literal.
///
/// Printable ASCII other than `"` and `\` is written as is; every other byte
/// becomes `\hh` with two lowercase hex digits.
pub fn escape_bytes<W: Write + ?Sized>(out: &mut W, bytes: &[u8]) -> fmt::Result {
    escape_where(out, bytes, |_| true)
}

fn escape_where<W: Write + ?Sized>(
    out: &mut W,
    bytes: &[u8],
    verbatim: impl Fn(u8) -> bool,
) -> fmt::Result {
    for &byte in bytes {
        if (0x20..=0x7E).contains(&byte) && byte != b'"' && byte != b'\\' && verbatim(byte) {
            out.write_char(char::from(byte))?;
        } else {
            write!(out, "\\{:02x}", byte)?;
        }
    }
    Ok(())
}
