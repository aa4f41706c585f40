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

//! Expression tokenizer.
//!
//! A byte-at-a-time deterministic state machine. A transition that needs to
//! "re-feed" the current byte to a new state simply assigns the new state
//! without advancing the [`Cursor`]; the next iteration of the driving loop
//! in [`tokenize`] sees the same byte again under the new state.

use crate::lang::error::ExprError;
use crate::lang::input::Cursor;
use crate::lang::token::{BinaryOp, Token, TokenKind, UnaryOp};
use crate::num::Base;
use crate::symbol::SymbolTable;
use crate::value::Value;

#[derive(Clone, Copy, Debug)]
enum State {
    /// Waiting for the start of an operand.
    ExprBegin,

    /// Waiting for what follows a completed operand.
    ExprEnd,

    /// Accumulating a bare numeric run, started by `[0-9]`.
    Constant { start: usize },

    /// Accumulating the digits of a `%`/`@`/`$` constant.
    PrefixConstant { token_start: usize, digits_start: usize, base: Base },

    /// Just consumed the opening `'` of a char constant; waiting for its
    /// one content byte.
    CharConstant { start: usize },

    /// Captured the one content byte of a char constant; waiting for the
    /// closing `'`.
    CharConstantClose { start: usize, value: u8 },

    /// Just consumed a binary operator's first byte.
    BinaryOperator { index: usize, first: u8 },

    /// Accumulating an identifier (or local identifier).
    Label { start: usize },
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | 0x0B | 0x0C | b'\r' | b'\n')
}

fn is_constant_begin(b: u8) -> bool {
    b.is_ascii_digit()
}

fn is_constant_mid(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'a'..=b'f' | b'A'..=b'F')
}

fn is_unary(b: u8) -> bool {
    matches!(b, b'~' | b'-')
}

fn is_binop_first(b: u8) -> bool {
    matches!(b, b'+' | b'-' | b'*' | b'/' | b'%' | b'<' | b'>' | b'=' | b'!' | b'&' | b'^' | b'|')
}

fn is_binop_second(b: u8) -> bool {
    matches!(b, b'<' | b'>' | b'=')
}

fn is_label_begin(b: u8, local_label_char: u8) -> bool {
    b.is_ascii_alphabetic() || b == local_label_char
}

fn is_label_mid(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

fn one_byte_binop(first: u8) -> Option<BinaryOp> {
    match first {
        b'+' => Some(BinaryOp::Plus),
        b'-' => Some(BinaryOp::Minus),
        b'*' => Some(BinaryOp::Times),
        b'/' => Some(BinaryOp::Div),
        b'%' => Some(BinaryOp::Mod),
        b'<' => Some(BinaryOp::Lt),
        b'>' => Some(BinaryOp::Gt),
        b'=' => Some(BinaryOp::Eq),
        b'&' => Some(BinaryOp::And),
        b'|' => Some(BinaryOp::Or),
        b'^' => Some(BinaryOp::Xor),
        _    => None,
    }
}

fn two_byte_binop(first: u8, second: u8) -> Option<BinaryOp> {
    match (first, second) {
        (b'<', b'<') => Some(BinaryOp::Lsl),
        (b'<', b'=') => Some(BinaryOp::Le),
        (b'>', b'>') => Some(BinaryOp::Lsr),
        (b'>', b'=') => Some(BinaryOp::Ge),
        (b'=', b'=') => Some(BinaryOp::Eq),
        (b'!', b'=') => Some(BinaryOp::Ne),
        _             => None,
    }
}

fn resolve_label(
    name:             &[u8],
    local_label_char: u8,
    globals:          &SymbolTable,
    locals:           &SymbolTable,
) -> Result<Value, ExprError> {
    let (table, lookup) = match name.split_first() {
        Some((&first, rest)) if first == local_label_char => (locals, rest),
        _                                                  => (globals, name),
    };

    let name = String::from_utf8_lossy(lookup);

    table.find(&name).ok_or_else(|| ExprError::UnknownLabel(name.into_owned()))
}

/// Tokenizes `text` into a vector of [`Token`]s.
///
/// Numeric, character, and label constants are decoded (and labels
/// resolved against `globals`/`locals`) as they are tokenized, so every
/// emitted [`TokenKind::Constant`] already carries its final [`Value`].
pub fn tokenize(
    text:             &[u8],
    location_counter: Value,
    local_label_char: u8,
    globals:          &SymbolTable,
    locals:           &SymbolTable,
) -> Result<Vec<Token>, ExprError> {
    let mut cur         = Cursor::new(text);
    let mut state       = State::ExprBegin;
    let mut paren_depth = 0usize;
    let mut tokens      = Vec::new();

    loop {
        state = match state {
            State::ExprBegin => match cur.current() {
                None => return Err(ExprError::ExpectedExpression),

                Some(b) if is_whitespace(b) => {
                    cur.advance();
                    State::ExprBegin
                }

                Some(b) if is_unary(b) => {
                    let index = cur.position();
                    let op = if b == b'~' { UnaryOp::Invert } else { UnaryOp::Negate };
                    tokens.push(Token { index, len: 1, kind: TokenKind::UnaryOp(op) });
                    cur.advance();
                    State::ExprBegin
                }

                Some(b) if is_constant_begin(b) => State::Constant { start: cur.position() },

                Some(b) if Base::from_prefix(b).is_some() => {
                    let token_start = cur.position();
                    let base = Base::from_prefix(b).expect("checked above");
                    cur.advance();
                    State::PrefixConstant { token_start, digits_start: cur.position(), base }
                }

                Some(b'\'') => {
                    let start = cur.position();
                    cur.advance();
                    State::CharConstant { start }
                }

                Some(b'(') => {
                    let index = cur.position();
                    tokens.push(Token { index, len: 1, kind: TokenKind::LParen });
                    paren_depth += 1;
                    cur.advance();
                    State::ExprBegin
                }

                Some(b) if is_label_begin(b, local_label_char) => {
                    State::Label { start: cur.position() }
                }

                Some(b) => return Err(ExprError::UnexpectedCharAtBegin(b as char)),
            },

            State::ExprEnd => match cur.current() {
                None if paren_depth > 0 => return Err(ExprError::UnclosedParens(paren_depth)),
                None                    => return Ok(tokens),

                Some(b) if is_whitespace(b) => {
                    cur.advance();
                    State::ExprEnd
                }

                Some(b) if is_binop_first(b) => {
                    let index = cur.position();
                    cur.advance();
                    State::BinaryOperator { index, first: b }
                }

                Some(b')') => {
                    if paren_depth == 0 {
                        return Err(ExprError::UnmatchedCloseParen);
                    }
                    paren_depth -= 1;
                    let index = cur.position();
                    tokens.push(Token { index, len: 1, kind: TokenKind::RParen });
                    cur.advance();
                    State::ExprEnd
                }

                Some(b) => return Err(ExprError::UnexpectedCharAtEnd(b as char)),
            },

            // `is_constant_mid` matches `a-f`/`A-F`, which already swallows
            // the binary/decimal suffix letters `b`/`B`/`d`/`D` into the
            // run itself — those two suffixes can never appear as the
            // unconsumed terminator byte below, only as the last byte of
            // the already-accumulated span. The octal/hex suffixes `o`/`O`/
            // `h`/`H` are not hex digits, so they terminate the run and are
            // still unconsumed when we get here.
            State::Constant { start } => match cur.current() {
                Some(b) if is_constant_mid(b) => {
                    cur.advance();
                    State::Constant { start }
                }

                terminator => {
                    let digit_end = cur.position();

                    let (base, digits) = match terminator.and_then(Base::from_suffix) {
                        Some(base) => {
                            cur.advance();
                            (base, &text[start..digit_end])
                        }
                        None => match Base::from_suffix(text[digit_end - 1]) {
                            Some(base) => (base, &text[start..digit_end - 1]),
                            None       => (Base::Decimal, &text[start..digit_end]),
                        },
                    };

                    let value = base.parse(digits).ok_or_else(|| ExprError::InvalidConstant {
                        base,
                        text: String::from_utf8_lossy(digits).into_owned(),
                    })?;
                    tokens.push(Token {
                        index: start,
                        len:   cur.position() - start,
                        kind:  TokenKind::Constant(value),
                    });
                    State::ExprEnd
                }
            },

            State::PrefixConstant { token_start, digits_start, base } => match cur.current() {
                Some(b) if is_constant_mid(b) => {
                    cur.advance();
                    State::PrefixConstant { token_start, digits_start, base }
                }

                _ => {
                    let digits = &text[digits_start..cur.position()];
                    let value = if digits.is_empty() {
                        if base == Base::Hexadecimal {
                            location_counter
                        } else {
                            return Err(ExprError::InvalidConstant { base, text: String::new() });
                        }
                    } else {
                        base.parse(digits).ok_or_else(|| ExprError::InvalidConstant {
                            base,
                            text: String::from_utf8_lossy(digits).into_owned(),
                        })?
                    };
                    tokens.push(Token {
                        index: token_start,
                        len:   cur.position() - token_start,
                        kind:  TokenKind::Constant(value),
                    });
                    State::ExprEnd
                }
            },

            State::CharConstant { start } => match cur.current() {
                None => return Err(ExprError::UnterminatedCharConstant),
                Some(b) => {
                    cur.advance();
                    State::CharConstantClose { start, value: b }
                }
            },

            State::CharConstantClose { start, value } => match cur.current() {
                None => return Err(ExprError::UnterminatedCharConstant),

                Some(b'\'') => {
                    cur.advance();
                    tokens.push(Token {
                        index: start,
                        len:   cur.position() - start,
                        kind:  TokenKind::Constant(value as Value),
                    });
                    State::ExprEnd
                }

                Some(b) => return Err(ExprError::ExpectedSingleQuote(b as char)),
            },

            State::BinaryOperator { index, first } => match cur.current() {
                Some(second) if is_binop_second(second) => {
                    cur.advance();
                    match two_byte_binop(first, second) {
                        Some(op) => {
                            tokens.push(Token {
                                index,
                                len:  cur.position() - index,
                                kind: TokenKind::BinaryOp(op),
                            });
                            State::ExprBegin
                        }
                        None => return Err(ExprError::UnexpectedCharAtEnd(second as char)),
                    }
                }

                _ => match one_byte_binop(first) {
                    Some(op) => {
                        tokens.push(Token { index, len: 1, kind: TokenKind::BinaryOp(op) });
                        State::ExprBegin
                    }
                    None => return Err(ExprError::UnexpectedCharAtEnd(first as char)),
                },
            },

            State::Label { start } => match cur.current() {
                Some(b) if is_label_mid(b) => {
                    cur.advance();
                    State::Label { start }
                }

                _ => {
                    let name  = &text[start..cur.position()];
                    let value = resolve_label(name, local_label_char, globals, locals)?;
                    tokens.push(Token {
                        index: start,
                        len:   cur.position() - start,
                        kind:  TokenKind::Constant(value),
                    });
                    State::ExprEnd
                }
            },
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize_ok(text: &[u8]) -> Vec<Token> {
        tokenize(text, 0, b'_', &SymbolTable::new(), &SymbolTable::new()).unwrap()
    }

    #[test]
    fn decimal_constant() {
        let tokens = tokenize_ok(b"12345");
        assert_eq!(tokens, vec![Token { index: 0, len: 5, kind: TokenKind::Constant(12345) }]);
    }

    #[test]
    fn binary_prefix_constant() {
        let tokens = tokenize_ok(b"%10101010");
        assert_eq!(tokens[0].kind, TokenKind::Constant(0xAA));
    }

    #[test]
    fn binary_suffix_constant() {
        let tokens = tokenize_ok(b"10101010b");
        assert_eq!(tokens[0].kind, TokenKind::Constant(0xAA));
    }

    #[test]
    fn decimal_suffix_constant() {
        let tokens = tokenize_ok(b"12345D");
        assert_eq!(tokens[0].kind, TokenKind::Constant(12345));
    }

    #[test]
    fn octal_prefix_constant() {
        let tokens = tokenize_ok(b"@12345");
        assert_eq!(tokens[0].kind, TokenKind::Constant(0o12345));
    }

    #[test]
    fn octal_suffix_constant() {
        let tokens = tokenize_ok(b"12345o");
        assert_eq!(tokens[0].kind, TokenKind::Constant(0o12345));
    }

    #[test]
    fn hexadecimal_prefix_constant() {
        let tokens = tokenize_ok(b"$CAFEBABE");
        assert_eq!(tokens[0].kind, TokenKind::Constant(0xCAFEBABEu32 as Value));
    }

    #[test]
    fn bare_dollar_is_location_counter() {
        let tokens = tokenize(b"$", 0x8000, b'_', &SymbolTable::new(), &SymbolTable::new()).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Constant(0x8000));
    }

    #[test]
    fn global_label_lookup() {
        let mut globals = SymbolTable::new();
        globals.append("label", 12345);
        let tokens = tokenize(b"label", 0, b'_', &globals, &SymbolTable::new()).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Constant(12345));
    }

    #[test]
    fn local_label_lookup_strips_marker_byte() {
        let mut locals = SymbolTable::new();
        locals.append("label", 12345);
        let tokens = tokenize(b"_label", 0, b'_', &SymbolTable::new(), &locals).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Constant(12345));
    }

    #[test]
    fn unknown_label_is_an_error() {
        let err = tokenize(b"label", 0, b'_', &SymbolTable::new(), &SymbolTable::new()).unwrap_err();
        assert_eq!(err, ExprError::UnknownLabel("label".into()));
    }

    #[test]
    fn char_constant() {
        let tokens = tokenize_ok(b"'x'");
        assert_eq!(tokens[0].kind, TokenKind::Constant(b'x' as Value));
    }

    #[test]
    fn unterminated_char_constant_at_eof() {
        let err = tokenize(b"'x", 0, b'_', &SymbolTable::new(), &SymbolTable::new()).unwrap_err();
        assert_eq!(err, ExprError::UnterminatedCharConstant);
    }

    #[test]
    fn char_constant_missing_closing_quote() {
        let err = tokenize(b"'xy'", 0, b'_', &SymbolTable::new(), &SymbolTable::new()).unwrap_err();
        assert_eq!(err, ExprError::ExpectedSingleQuote('y'));
    }

    #[test]
    fn two_byte_operators() {
        let tokens = tokenize_ok(b"1<=2");
        assert_eq!(tokens[1].kind, TokenKind::BinaryOp(BinaryOp::Le));

        let tokens = tokenize_ok(b"1!=2");
        assert_eq!(tokens[1].kind, TokenKind::BinaryOp(BinaryOp::Ne));

        let tokens = tokenize_ok(b"1<<2");
        assert_eq!(tokens[1].kind, TokenKind::BinaryOp(BinaryOp::Lsl));
    }

    #[test]
    fn one_byte_operator_re_feeds_next_operand() {
        let tokens = tokenize_ok(b"1+2");
        assert_eq!(tokens[1].kind, TokenKind::BinaryOp(BinaryOp::Plus));
        assert_eq!(tokens[2].kind, TokenKind::Constant(2));
    }

    #[test]
    fn parens_are_tracked() {
        let tokens = tokenize_ok(b"(1)");
        assert_eq!(tokens[0].kind, TokenKind::LParen);
        assert_eq!(tokens[2].kind, TokenKind::RParen);
    }

    #[test]
    fn unmatched_close_paren_is_an_error() {
        let err = tokenize(b"3)", 0, b'_', &SymbolTable::new(), &SymbolTable::new()).unwrap_err();
        assert_eq!(err, ExprError::UnmatchedCloseParen);
    }

    #[test]
    fn unclosed_paren_is_an_error() {
        let err = tokenize(b"(3", 0, b'_', &SymbolTable::new(), &SymbolTable::new()).unwrap_err();
        assert_eq!(err, ExprError::UnclosedParens(1));
    }

    #[test]
    fn invalid_binary_digit_is_an_error() {
        let err = tokenize(b"%11201100", 0, b'_', &SymbolTable::new(), &SymbolTable::new()).unwrap_err();
        assert_eq!(
            err,
            ExprError::InvalidConstant { base: Base::Binary, text: "11201100".into() }
        );
    }

    #[test]
    fn garbage_hex_digits_are_an_error() {
        let err = tokenize(b"$garbage", 0, b'_', &SymbolTable::new(), &SymbolTable::new());
        assert!(err.is_err());
    }

    #[test]
    fn whitespace_classes_separate_operands() {
        let tokens = tokenize_ok(b"1+\x0c1");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].kind, TokenKind::Constant(1));
    }

    #[test]
    fn empty_expression_is_an_error() {
        let err = tokenize(b"", 0, b'_', &SymbolTable::new(), &SymbolTable::new()).unwrap_err();
        assert_eq!(err, ExprError::ExpectedExpression);
    }
}
