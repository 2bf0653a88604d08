//! Control flow expressions and function literals.
//!
//! ```text
//! if     := "if" "(" expr ")" branch ("else" (if | branch))?
//! for    := "for" "(" pattern ("," pattern)? "in" expr_list ")" branch
//! fn     := "fn" "(" (pattern ("=" expr)?),* ")" block
//! branch := block | expr
//! ```
//!
//! After `if`, `for`, `fn` and `else`, `{` opens a block. Everywhere else
//! in operand position it opens a dictionary.

use quill_ir::{ExprId, ExprKind, ForBindings, Param, TokenKind};

use crate::{ParseError, Parser};

impl Parser {
    pub(crate) fn parse_if(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.advance().span;
        let open = self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect_closing(&TokenKind::RParen, open)?;
        let then_branch = self.parse_branch()?;

        let else_branch = if self.cursor.check(&TokenKind::Else) {
            self.cursor.advance();
            if self.cursor.check(&TokenKind::If) {
                Some(self.nested(Self::parse_if)?)
            } else {
                Some(self.parse_branch()?)
            }
        } else {
            None
        };

        let end = self.span_of(else_branch.unwrap_or(then_branch));
        Ok(self.alloc(
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            },
            start.merge(end),
        ))
    }

    pub(crate) fn parse_for(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.advance().span;
        let open = self.expect(&TokenKind::LParen)?;
        let first = self.parse_pattern()?;
        let second = if self.cursor.check(&TokenKind::Comma) {
            self.cursor.advance();
            Some(self.parse_pattern()?)
        } else {
            None
        };
        self.expect(&TokenKind::In)?;
        let iterable = self.parse_expr_list()?;
        self.expect_closing(&TokenKind::RParen, open)?;
        let body = self.parse_branch()?;

        let span = start.merge(self.span_of(body));
        Ok(self.alloc(
            ExprKind::For {
                bindings: ForBindings { first, second },
                iterable,
                body,
            },
            span,
        ))
    }

    pub(crate) fn parse_function(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.advance().span;
        let open = self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.cursor.check(&TokenKind::RParen) && !self.cursor.is_at_end() {
            let pattern = self.parse_pattern()?;
            let default = if self.cursor.check(&TokenKind::Eq) {
                self.cursor.advance();
                Some(self.parse_expr()?)
            } else {
                None
            };
            params.push(Param { pattern, default });
            if !self.cursor.check(&TokenKind::Comma) {
                break;
            }
            self.cursor.advance();
        }
        self.expect_closing(&TokenKind::RParen, open)?;
        if !self.cursor.check(&TokenKind::LBrace) {
            return Err(self.unexpected("`{` to start the function body"));
        }
        let body = self.parse_block()?;
        let span = start.merge(self.span_of(body));
        Ok(self.alloc(ExprKind::Function { params, body }, span))
    }

    /// `{ stmts }`. Statement errors inside are recorded and skipped.
    pub(crate) fn parse_block(&mut self) -> Result<ExprId, ParseError> {
        let open = self.cursor.advance().span;
        self.nested(|p| {
            let stmts = p.parse_statements(true);
            let close = p.expect_closing(&TokenKind::RBrace, open)?;
            Ok(p.alloc(ExprKind::Block(stmts), open.merge(close)))
        })
    }

    /// Body of `if`/`else`/`for`: a block or a single expression.
    fn parse_branch(&mut self) -> Result<ExprId, ParseError> {
        if self.cursor.check(&TokenKind::LBrace) {
            self.parse_block()
        } else {
            self.parse_expr()
        }
    }
}
