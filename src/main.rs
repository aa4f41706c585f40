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

#![allow(dead_code)]

mod asm;
mod lang;
mod message;
mod num;
mod object;
mod symbol;
mod util;
mod value;

use std::env::args;
use std::io::{self, stderr, Write};
use std::process::ExitCode;

use asm::Assembler;

/// The name of the assembler.
pub const PROGRAM_NAME: &str = "asmforge";

fn main() -> ExitCode {
    match run() {
        Ok (())  => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(stderr(), "{}: {}", PROGRAM_NAME, err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> io::Result<()> {
    let mut args = args();
    args.next();

    let mut asm  = Assembler::new();
    let     args = args.collect::<Vec<_>>();

    if args.is_empty() {
        writeln!(stderr(), "reading stdin")?;
        let _ = asm.assemble_stdin();
    } else {
        for arg in &args {
            if arg == "-" {
                writeln!(stderr(), "reading stdin")?;
                let _ = asm.assemble_stdin();
            } else {
                writeln!(stderr(), "reading {}", arg)?;
                let _ = asm.assemble_file(arg);
            }
        }
    }

    let _ = asm.write_output();

    match asm.result() {
        Ok (())  => Ok(()),
        Err(())  => Err(io::Error::new(io::ErrorKind::Other, "assembly failed")),
    }
}
