// This file is part of asmforge, an assembler.
// Copyright 2024 the asmforge contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later
//
// asmforge is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// asmforge is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with asmforge.  If not, see <http://www.gnu.org/licenses/>.

//! Top-level assembler interface.
//!
//! This driver is deliberately partial: it recognizes label definitions and
//! `; expr` value directives, enough to exercise the symbol table, the
//! expression evaluator, and the object buffer end to end. A full two-pass
//! assembler with real instruction encoding is out of scope.

use std::fmt::Display;
use std::fs;
use std::io::{stdin, stdout, Read};

use crate::lang::eval;
use crate::message::*;
use crate::object::ObjectOutput;
use crate::symbol::SymbolTable;
use crate::util::Location;

/// Type returned by fallible assembler methods.
pub type Result<T=(), E=()> = std::result::Result<T, E>;

/// The byte that marks a label reference (or definition) as local to the
/// nearest preceding global label. This driver keeps a single flat local
/// scope rather than resetting it at each global label, since scoping
/// locals to a parent label is an out-of-scope two-pass-assembler concern.
const LOCAL_LABEL_CHAR: u8 = b'.';

/// Top-level assembler interface.
#[derive(Debug)]
pub struct Assembler {
    globals:       SymbolTable,
    locals:        SymbolTable,
    object:        ObjectOutput,
    warning_count: u16,
    error_count:   u16,
}

impl Assembler {
    /// Creates a new assembler.
    pub fn new() -> Self {
        Self {
            globals:       SymbolTable::new(),
            locals:        SymbolTable::new(),
            object:        ObjectOutput::new(),
            warning_count: 0,
            error_count:   0,
        }
    }

    /// Returns the result of assembly: `Err(())` if any condition prevented
    /// the assembler from producing output, and `Ok(())` otherwise.
    pub fn result(&self) -> Result {
        match self.error_count {
            0 => Ok (()),
            _ => Err(()),
        }
    }

    /// Assembles the file at the given `path`.
    pub fn assemble_file(&mut self, path: &str) -> Result {
        match fs::read_to_string(path) {
            Ok (s) => self.assemble_bytes(path, s.as_bytes()),
            Err(e) => ReadError(path, &e).tell(self),
        }
    }

    /// Assembles the bytes read from standard input.
    pub fn assemble_stdin(&mut self) -> Result {
        self.assemble_from("stdin", stdin())
    }

    /// Assembles the bytes read from `src`, using `path` as the pathname.
    pub fn assemble_from<R: Read>(&mut self, path: &str, mut src: R) -> Result {
        let mut s = String::new();
        match src.read_to_string(&mut s) {
            Ok (_) => self.assemble_bytes(path, s.as_bytes()),
            Err(e) => ReadError(path, &e).tell(self),
        }
    }

    /// Assembles the given `bytes`, using `path` as the pathname.
    ///
    /// Each line is one of:
    /// - a label definition: an identifier followed by `:`, bound to the
    ///   current address;
    /// - a value directive: `;` followed by an expression, whose evaluated
    ///   low byte is appended to the object buffer at the current address;
    /// - anything else, which this driver ignores — real instruction
    ///   mnemonics belong to the out-of-scope instruction encoder.
    pub fn assemble_bytes(&mut self, path: &str, bytes: &[u8]) -> Result {
        for (number, line) in bytes.split(|&b| b == b'\n').enumerate() {
            let loc  = Location::new(number as u32 + 1, 0);
            let line = trim(line);

            if let Some(name) = label_definition(line) {
                let address = self.object.current_address();
                self.globals.append(String::from_utf8_lossy(name).into_owned(), address);
                continue;
            }

            let Some(expr) = line.strip_prefix(b";") else { continue };

            match eval::evaluate(
                trim(expr),
                self.object.current_address(),
                LOCAL_LABEL_CHAR,
                &self.globals,
                &self.locals,
            ) {
                Ok (value) => self.object.write(&[value as u8]),
                Err(e)     => { let _ = FileMessage::new(e, path, loc).tell(self); }
            }
        }

        self.result()
    }

    /// Writes assembly output.
    pub fn write_output(&mut self) -> Result {
        match self.object.emit_binary(&mut stdout()) {
            Ok (_) => Ok(()),
            Err(e) => WriteError("stdout", &e).tell(self),
        }
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Trims ASCII whitespace from both ends of `line`.
fn trim(line: &[u8]) -> &[u8] {
    let line = match line.iter().position(|b| !b.is_ascii_whitespace()) {
        Some(i) => &line[i..],
        None    => return &[],
    };
    match line.iter().rposition(|b| !b.is_ascii_whitespace()) {
        Some(i) => &line[..=i],
        None    => &[],
    }
}

/// Recognizes a `name:` label definition line and returns `name`, if `line`
/// is one.
fn label_definition(line: &[u8]) -> Option<&[u8]> {
    let name = line.strip_suffix(b":")?;

    if name.is_empty() {
        return None;
    }

    let (&first, rest) = name.split_first()?;
    if !(first.is_ascii_alphabetic() || first == b'_' || first == LOCAL_LABEL_CHAR) {
        return None;
    }
    if !rest.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'_') {
        return None;
    }

    Some(name)
}

impl Log for Assembler {
    #[inline]
    fn log<M: Display>(&mut self, msg: M) -> Result {
        eprintln!("{}", msg);
        Ok(())
    }

    #[inline]
    fn log_warning<M: Display>(&mut self, msg: M) -> Result {
        self.warning_count += 1;
        self.log(msg)
    }

    #[inline]
    fn log_error<M: Display>(&mut self, msg: M) -> Result {
        self.error_count += 1;
        self.log(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace() {
        assert_eq!(trim(b"  ; 1 + 2  "), b"; 1 + 2");
        assert_eq!(trim(b"   "), b"");
        assert_eq!(trim(b""), b"");
    }

    #[test]
    fn recognizes_label_definitions() {
        assert_eq!(label_definition(b"start:"), Some(&b"start"[..]));
        assert_eq!(label_definition(b".loop:"), Some(&b".loop"[..]));
        assert_eq!(label_definition(b"3start:"), None);
        assert_eq!(label_definition(b"; 1 + 2"), None);
    }

    #[test]
    fn assembles_label_and_directive() {
        let mut asm = Assembler::new();
        let source = b"start:\n; $2A\n";
        assert_eq!(asm.assemble_bytes("t.asm", source), Ok(()));
        assert_eq!(asm.globals.find("start"), Some(0));

        let mut out = Vec::new();
        asm.object.emit_binary(&mut out).unwrap();
        assert_eq!(out, vec![0x2A]);
    }

    #[test]
    fn reports_expression_errors() {
        let mut asm = Assembler::new();
        assert_eq!(asm.assemble_bytes("t.asm", b"; 1 / 0\n"), Err(()));
    }
}
