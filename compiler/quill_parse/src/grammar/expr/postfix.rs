//! Postfix operators: call, index, slice, dot access.
//!
//! `(` and `[` only continue an expression on the same line; at the start
//! of a line they begin a new statement.

use quill_diagnostic::ErrorCode;
use quill_ir::{ExprId, ExprKind, TokenKind};

use crate::{ParseError, Parser};

impl Parser {
    pub(crate) fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            let same_line = !self.cursor.at_line_start();
            expr = match self.cursor.current_kind() {
                TokenKind::LParen if same_line => self.parse_call(expr)?,
                TokenKind::LBracket if same_line => self.parse_index(expr)?,
                TokenKind::Dot => self.parse_dot(expr)?,
                _ => return Ok(expr),
            };
        }
    }

    /// `f(a, b)`; a trailing comma is allowed.
    fn parse_call(&mut self, func: ExprId) -> Result<ExprId, ParseError> {
        let open = self.cursor.advance().span;
        let mut args = Vec::new();
        while !self.cursor.check(&TokenKind::RParen) && !self.cursor.is_at_end() {
            args.push(self.parse_expr()?);
            if !self.cursor.check(&TokenKind::Comma) {
                break;
            }
            self.cursor.advance();
        }
        let close = self.expect_closing(&TokenKind::RParen, open)?;
        let span = self.span_of(func).merge(close);
        Ok(self.alloc(ExprKind::Call { func, args }, span))
    }

    /// `a[i]`, `a[i:j]`, `a[:j]`, `a[i:]`, `a[:]`.
    fn parse_index(&mut self, target: ExprId) -> Result<ExprId, ParseError> {
        let open = self.cursor.advance().span;
        let start = if self.cursor.check(&TokenKind::Colon) {
            None
        } else {
            Some(self.parse_expr()?)
        };

        let kind = if self.cursor.check(&TokenKind::Colon) {
            self.cursor.advance();
            let end = if self.cursor.check(&TokenKind::RBracket) {
                None
            } else {
                Some(self.parse_expr()?)
            };
            ExprKind::Slice { target, start, end }
        } else {
            match start {
                Some(index) => ExprKind::Index { target, index },
                None => return Err(self.unexpected("index expression")),
            }
        };
        let close = self.expect_closing(&TokenKind::RBracket, open)?;
        let span = self.span_of(target).merge(close);
        Ok(self.alloc(kind, span))
    }

    /// `a.name`; keywords are accepted as property names (`x.in`).
    fn parse_dot(&mut self, target: ExprId) -> Result<ExprId, ParseError> {
        self.cursor.advance();
        let token = self.cursor.current().clone();
        let name = match &token.kind {
            TokenKind::Ident(name) => name.clone(),
            kind if kind.symbol().starts_with(|c: char| c.is_ascii_alphabetic()) => {
                kind.symbol().to_string()
            }
            _ => {
                let mut err = self.unexpected("property name");
                if err.code == ErrorCode::E1001 {
                    err.code = ErrorCode::E1004;
                }
                return Err(err);
            }
        };
        self.cursor.advance();
        let span = self.span_of(target).merge(token.span);
        Ok(self.alloc(ExprKind::Dot { target, name }, span))
    }
}
