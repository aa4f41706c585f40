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

//! Numeric bases for prefix/suffix integer constants.

use crate::value::Value;

/// The base (radix) of an integer constant, as indicated by a leading
/// prefix byte (`%`, `@`, `$`) or a trailing suffix byte (`B/O/D/H`).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Base {
    Binary,
    Octal,
    Decimal,
    Hexadecimal,
}

impl Base {
    /// The numeric radix of this base.
    #[inline]
    pub const fn radix(self) -> u32 {
        match self {
            Base::Binary      => 2,
            Base::Octal       => 8,
            Base::Decimal     => 10,
            Base::Hexadecimal => 16,
        }
    }

    /// The human-readable name of this base, used in diagnostics.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Base::Binary      => "binary",
            Base::Octal       => "octal",
            Base::Decimal     => "decimal",
            Base::Hexadecimal => "hexadecimal",
        }
    }

    /// Maps a constant-prefix byte (`%`, `@`, `$`) to its base, if any.
    /// `$` alone (no digits) is handled by the caller as the location
    /// counter, not as a constant with this base.
    pub const fn from_prefix(byte: u8) -> Option<Base> {
        match byte {
            b'%' => Some(Base::Binary),
            b'@' => Some(Base::Octal),
            b'$' => Some(Base::Hexadecimal),
            _    => None,
        }
    }

    /// Maps a constant-suffix byte (`B/O/D/H`, either case) to its base.
    pub const fn from_suffix(byte: u8) -> Option<Base> {
        match byte {
            b'B' | b'b' => Some(Base::Binary),
            b'O' | b'o' => Some(Base::Octal),
            b'D' | b'd' => Some(Base::Decimal),
            b'H' | b'h' => Some(Base::Hexadecimal),
            _           => None,
        }
    }

    /// Parses `digits` in this base into a `Value`, wrapping on overflow.
    /// Returns `None` if `digits` is empty or contains a byte that is not a
    /// valid digit of this base.
    pub fn parse(self, digits: &[u8]) -> Option<Value> {
        if digits.is_empty() {
            return None;
        }

        let radix = self.radix() as u64;
        let mut acc: u64 = 0;

        for &b in digits {
            let digit = (b as char).to_digit(radix)?;
            acc = acc.wrapping_mul(radix).wrapping_add(digit as u64);
        }

        Some(acc as Value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Base::Binary,      2)]
    #[case(Base::Octal,       8)]
    #[case(Base::Decimal,    10)]
    #[case(Base::Hexadecimal, 16)]
    fn radix_values(#[case] base: Base, #[case] radix: u32) {
        assert_eq!(base.radix(), radix);
    }

    #[rstest]
    #[case(b'%', Some(Base::Binary))]
    #[case(b'@', Some(Base::Octal))]
    #[case(b'$', Some(Base::Hexadecimal))]
    #[case(b'#', None)]
    fn prefix_mapping(#[case] byte: u8, #[case] expected: Option<Base>) {
        assert_eq!(Base::from_prefix(byte), expected);
    }

    #[rstest]
    #[case(b'B', Some(Base::Binary))]
    #[case(b'o', Some(Base::Octal))]
    #[case(b'D', Some(Base::Decimal))]
    #[case(b'h', Some(Base::Hexadecimal))]
    #[case(b'X', None)]
    fn suffix_mapping(#[case] byte: u8, #[case] expected: Option<Base>) {
        assert_eq!(Base::from_suffix(byte), expected);
    }

    #[test]
    fn parse_binary() {
        assert_eq!(Base::Binary.parse(b"10101010"), Some(0xAA));
    }

    #[test]
    fn parse_binary_rejects_invalid_digit() {
        assert_eq!(Base::Binary.parse(b"11201100"), None);
    }

    #[test]
    fn parse_octal() {
        assert_eq!(Base::Octal.parse(b"12345"), Some(0o12345));
    }

    #[test]
    fn parse_decimal_rejects_hex_digit() {
        assert_eq!(Base::Decimal.parse(b"123a5"), None);
    }

    #[test]
    fn parse_hexadecimal_case_insensitive() {
        assert_eq!(Base::Hexadecimal.parse(b"cafebabe"), Some(0xCAFEBABEu32 as Value));
        assert_eq!(Base::Hexadecimal.parse(b"CAFEBABE"), Some(0xCAFEBABEu32 as Value));
    }

    #[test]
    fn parse_empty_is_none() {
        assert_eq!(Base::Hexadecimal.parse(b""), None);
    }
}
