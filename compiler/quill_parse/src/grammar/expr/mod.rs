//! Expression parsing.
//!
//! # Module Structure
//!
//! - `mod.rs`: entry points (`parse_expr_list`, `parse_expr`) and the
//!   precedence-climbing loop
//! - `operators.rs`: operator matching
//! - `primary.rs`: literals, identifiers, grouping, regex and tag operands
//! - `postfix.rs`: call, index, slice, dot
//! - `collections.rs`: array and dictionary literals
//! - `control.rs`: `if`, `for`, `fn`, blocks
//! - `template.rs`: strings and `@(...)` templates with interpolation

mod collections;
mod control;
mod operators;
mod postfix;
mod primary;
mod template;

use quill_ir::{ExprId, ExprKind, TokenKind};

use crate::{ParseError, Parser};

/// Tokens that can begin an operand.
pub(crate) fn can_start_expression(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Str { .. }
            | TokenKind::At { .. }
            | TokenKind::AtTemplate { .. }
            | TokenKind::Ident(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::LBrace
            | TokenKind::Fn
            | TokenKind::If
            | TokenKind::For
            | TokenKind::Import
            | TokenKind::Minus
            | TokenKind::Bang
            | TokenKind::Not
            | TokenKind::Slash
            | TokenKind::Lt
    )
}

impl Parser {
    /// Parse an expression, or a bare comma list of expressions which
    /// becomes an array (`1, 2, 3` is `[1, 2, 3]`). A trailing comma is
    /// allowed.
    pub(crate) fn parse_expr_list(&mut self) -> Result<ExprId, ParseError> {
        let first = self.parse_expr()?;
        if !self.cursor.check(&TokenKind::Comma) {
            return Ok(first);
        }
        let start = self.span_of(first);
        let mut items = vec![first];
        while self.cursor.check(&TokenKind::Comma) {
            self.cursor.advance();
            if !can_start_expression(self.cursor.current_kind()) {
                break;
            }
            items.push(self.parse_expr()?);
        }
        let span = start.merge(self.cursor.previous_end());
        Ok(self.alloc(ExprKind::Array(items), span))
    }

    /// Parse a single expression (no bare comma list).
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        self.nested(|p| p.parse_binary(1))
    }

    /// Precedence climbing: parse operators binding at least as tightly as
    /// `min_prec`. All binary operators are left-associative.
    fn parse_binary(&mut self, min_prec: u8) -> Result<ExprId, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            if self.tag_follows(left) {
                break;
            }
            let Some(op) = self.match_binary_op() else {
                break;
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.cursor.advance();
            let right = self.nested(|p| p.parse_binary(prec + 1))?;
            let span = self.span_of(left).merge(self.span_of(right));
            left = self.alloc(ExprKind::Binary { op, left, right }, span);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let Some(op) = self.match_unary_op() else {
            return self.parse_postfix();
        };
        let start = self.cursor.advance().span;
        let operand = self.nested(Self::parse_unary)?;
        let span = start.merge(self.span_of(operand));
        Ok(self.alloc(ExprKind::Unary { op, operand }, span))
    }

    /// A `<` that opens a tag after a tag, or at the start of a line, begins
    /// the next statement instead of a comparison.
    fn tag_follows(&self, left: ExprId) -> bool {
        if !self.cursor.check(&TokenKind::Lt) {
            return false;
        }
        let after_tag = matches!(self.arena.get_expr(left).kind, ExprKind::Tag(_));
        (after_tag || self.cursor.at_line_start()) && self.cursor.lt_starts_tag()
    }
}
