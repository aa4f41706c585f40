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

//! Expression evaluation.
//!
//! Evaluation is a single left-to-right pass over the token vector produced
//! by [`crate::lang::lexer::tokenize`]. There is no operator precedence:
//! `3 + 3 / 3` evaluates as `(3 + 3) / 3`, not `3 + (3 / 3)`. Parentheses are
//! the only way to group a sub-expression, and are handled by recursing one
//! level per `(`.

use crate::lang::error::ExprError;
use crate::lang::lexer;
use crate::lang::token::{BinaryOp, Token, TokenKind, UnaryOp};
use crate::symbol::SymbolTable;
use crate::value::{self, Value};

/// Tokenizes and evaluates `text` to a single [`Value`].
///
/// `location_counter` is the value substituted for a bare `$`.
/// `local_label_char` is the byte that marks a label reference as local
/// (looked up in `locals` instead of `globals`).
pub fn evaluate(
    text:             &[u8],
    location_counter: Value,
    local_label_char: u8,
    globals:          &SymbolTable,
    locals:           &SymbolTable,
) -> Result<Value, ExprError> {
    let tokens = lexer::tokenize(text, location_counter, local_label_char, globals, locals)?;
    let mut pos = 0;
    let value = parse_expr(&tokens, &mut pos)?;

    debug_assert_eq!(pos, tokens.len(), "tokenizer guarantees a single balanced expression");

    Ok(value)
}

/// Parses and evaluates a maximal run of `operand (binop operand)*`,
/// stopping before a `)` or at the end of the token vector.
fn parse_expr(tokens: &[Token], pos: &mut usize) -> Result<Value, ExprError> {
    let mut acc = parse_operand(tokens, pos)?;

    while let Some(token) = tokens.get(*pos) {
        let op = match token.kind {
            TokenKind::BinaryOp(op) => op,
            _                       => break,
        };

        *pos += 1;
        let rhs = parse_operand(tokens, pos)?;
        acc = apply_binary(op, acc, rhs)?;
    }

    Ok(acc)
}

/// Parses a single operand: an optional run of unary operators, then either
/// a constant or a fully parenthesized sub-expression.
///
/// The tokenizer has already validated that every `(` has a matching `)` and
/// that an operand follows every position where one is required, so the
/// shapes not handled below cannot occur.
fn parse_operand(tokens: &[Token], pos: &mut usize) -> Result<Value, ExprError> {
    match tokens[*pos].kind {
        TokenKind::UnaryOp(op) => {
            *pos += 1;
            let value = parse_operand(tokens, pos)?;
            Ok(apply_unary(op, value))
        }

        TokenKind::Constant(value) => {
            *pos += 1;
            Ok(value)
        }

        TokenKind::LParen => {
            *pos += 1;
            let value = parse_expr(tokens, pos)?;
            *pos += 1; // the matching RParen
            Ok(value)
        }

        TokenKind::BinaryOp(_) | TokenKind::RParen => {
            unreachable!("tokenizer guarantees an operand at this position")
        }
    }
}

fn apply_unary(op: UnaryOp, value: Value) -> Value {
    match op {
        UnaryOp::Invert => !value,
        UnaryOp::Negate => value.wrapping_neg(),
    }
}

fn apply_binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, ExprError> {
    use BinaryOp::*;

    Ok(match op {
        Plus  => lhs.wrapping_add(rhs),
        Minus => lhs.wrapping_sub(rhs),
        Times => lhs.wrapping_mul(rhs),

        Div => {
            if rhs == 0 { return Err(ExprError::DivideByZero); }
            lhs.wrapping_div(rhs)
        }

        Mod => {
            if rhs == 0 { return Err(ExprError::DivideByZero); }
            lhs.wrapping_rem(rhs)
        }

        Lsl => value::shl(lhs, shift_amount(rhs)?),
        Lsr => value::shr(lhs, shift_amount(rhs)?),

        Eq => value::bool_value(lhs == rhs),
        Ne => value::bool_value(lhs != rhs),
        Lt => value::bool_value(lhs <  rhs),
        Gt => value::bool_value(lhs >  rhs),
        Le => value::bool_value(lhs <= rhs),
        Ge => value::bool_value(lhs >= rhs),

        And => lhs & rhs,
        Or  => lhs | rhs,
        Xor => lhs ^ rhs,
    })
}

/// Validates a shift amount, which must fit in the width of a [`Value`].
fn shift_amount(rhs: Value) -> Result<u32, ExprError> {
    if (0..64).contains(&rhs) {
        Ok(rhs as u32)
    } else {
        Err(ExprError::ShiftOverflow(rhs))
    }
}
