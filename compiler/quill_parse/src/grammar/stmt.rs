//! Statement parsing.
//!
//! ```text
//! stmt := "let" bindings ("=" expr_list | "<==" expr_list)
//!       | "export" "let" bindings "=" expr_list
//!       | "export" IDENT "=" expr_list
//!       | "return" expr_list? | "break" | "continue"
//!       | pattern ("=" | "<==") expr_list          // `{`/`[` at statement start
//!       | expr_list ("=" expr_list | "<==" expr_list | ("==>" | "==>>") expr)?
//! ```

use quill_diagnostic::ErrorCode;
use quill_ir::{AssignTarget, ExprId, ExprKind, Pattern, PatternId, PatternKind, Stmt, StmtId, StmtKind, TokenKind};

use crate::grammar::can_start_expression;
use crate::{ParseError, Parser};

impl Parser {
    pub(crate) fn parse_stmt(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.current_span();
        let kind = match self.cursor.current_kind() {
            TokenKind::Let => {
                self.cursor.advance();
                self.parse_let(false)?
            }
            TokenKind::Export => self.parse_export()?,
            TokenKind::Return => {
                self.cursor.advance();
                let value = if self.expression_follows_on_line() {
                    Some(self.parse_expr_list()?)
                } else {
                    None
                };
                StmtKind::Return(value)
            }
            TokenKind::Break => {
                self.cursor.advance();
                StmtKind::Break
            }
            TokenKind::Continue => {
                self.cursor.advance();
                StmtKind::Continue
            }
            TokenKind::LBrace | TokenKind::LBracket => match self.try_destructure() {
                Some(pattern) => self.finish_destructure(pattern)?,
                None => self.parse_expr_stmt()?,
            },
            _ => self.parse_expr_stmt()?,
        };
        let span = start.merge(self.cursor.previous_end());
        Ok(self.arena.alloc_stmt(Stmt::new(kind, span)))
    }

    fn parse_let(&mut self, export: bool) -> Result<StmtKind, ParseError> {
        let pattern = self.parse_binding_list()?;
        match self.cursor.current_kind() {
            TokenKind::Eq => {
                self.cursor.advance();
                let value = self.parse_expr_list()?;
                Ok(StmtKind::Let {
                    pattern,
                    value,
                    export,
                })
            }
            TokenKind::ReadArrow if !export => {
                self.cursor.advance();
                let source = self.parse_expr_list()?;
                Ok(StmtKind::Read {
                    pattern,
                    source,
                    declare: true,
                })
            }
            _ => Err(self.unexpected(if export { "`=`" } else { "`=` or `<==`" })),
        }
    }

    fn parse_export(&mut self) -> Result<StmtKind, ParseError> {
        self.cursor.advance();
        if self.cursor.check(&TokenKind::Let) {
            self.cursor.advance();
            return self.parse_let(true);
        }
        let (name, span) = self.expect_ident()?;
        self.expect(&TokenKind::Eq)?;
        let value = self.parse_expr_list()?;
        let pattern = self
            .arena
            .alloc_pattern(Pattern::new(PatternKind::Ident(name), span));
        Ok(StmtKind::Assign {
            target: AssignTarget::Pattern(pattern),
            value,
            export: true,
        })
    }

    /// `a`, `a, b`, `a, ...rest`, or a single bracketed pattern.
    fn parse_binding_list(&mut self) -> Result<PatternId, ParseError> {
        let first = self.parse_pattern()?;
        if !self.cursor.check(&TokenKind::Comma) {
            return Ok(first);
        }
        let start = self.arena.get_pattern(first).span;
        let mut elements = vec![first];
        let mut rest = None;
        while self.cursor.check(&TokenKind::Comma) {
            self.cursor.advance();
            if self.cursor.check(&TokenKind::DotDotDot) {
                self.cursor.advance();
                rest = Some(self.expect_ident()?.0);
                break;
            }
            elements.push(self.parse_pattern()?);
        }
        let span = start.merge(self.cursor.previous_end());
        Ok(self
            .arena
            .alloc_pattern(Pattern::new(PatternKind::Array { elements, rest }, span)))
    }

    /// A statement starting with `{` or `[` is a pattern only when the
    /// whole pattern is followed by `=` or `<==`.
    fn try_destructure(&mut self) -> Option<PatternId> {
        self.try_parse(|p| {
            let pattern = p.parse_pattern().ok()?;
            let assigns = p.cursor.check(&TokenKind::Eq) || p.cursor.check(&TokenKind::ReadArrow);
            assigns.then_some(pattern)
        })
    }

    fn finish_destructure(&mut self, pattern: PatternId) -> Result<StmtKind, ParseError> {
        let read = self.cursor.check(&TokenKind::ReadArrow);
        self.cursor.advance();
        let value = self.parse_expr_list()?;
        Ok(if read {
            StmtKind::Read {
                pattern,
                source: value,
                declare: false,
            }
        } else {
            StmtKind::Assign {
                target: AssignTarget::Pattern(pattern),
                value,
                export: false,
            }
        })
    }

    fn parse_expr_stmt(&mut self) -> Result<StmtKind, ParseError> {
        let expr = self.parse_expr_list()?;
        match self.cursor.current_kind() {
            TokenKind::Eq => {
                let target = self.assign_target(expr)?;
                self.cursor.advance();
                let value = self.parse_expr_list()?;
                Ok(StmtKind::Assign {
                    target,
                    value,
                    export: false,
                })
            }
            TokenKind::ReadArrow => {
                let pattern = self.expr_to_pattern(expr)?;
                self.cursor.advance();
                let source = self.parse_expr_list()?;
                Ok(StmtKind::Read {
                    pattern,
                    source,
                    declare: false,
                })
            }
            TokenKind::WriteArrow | TokenKind::AppendArrow => {
                let append = self.cursor.check(&TokenKind::AppendArrow);
                self.cursor.advance();
                let target = self.parse_expr()?;
                Ok(StmtKind::Write {
                    value: expr,
                    target,
                    append,
                })
            }
            _ => Ok(StmtKind::Expr(expr)),
        }
    }

    fn assign_target(&mut self, expr: ExprId) -> Result<AssignTarget, ParseError> {
        let place = matches!(
            self.arena.get_expr(expr).kind,
            ExprKind::Index { .. } | ExprKind::Dot { .. }
        );
        if place {
            Ok(AssignTarget::Place(expr))
        } else {
            Ok(AssignTarget::Pattern(self.expr_to_pattern(expr)?))
        }
    }

    /// Reinterpret an identifier or (nested) comma list of identifiers as a
    /// binding pattern.
    fn expr_to_pattern(&mut self, expr: ExprId) -> Result<PatternId, ParseError> {
        let node = self.arena.get_expr(expr).clone();
        let kind = match node.kind {
            ExprKind::Ident(name) => PatternKind::Ident(name),
            ExprKind::Array(items) => {
                let elements = items
                    .into_iter()
                    .map(|item| self.expr_to_pattern(item))
                    .collect::<Result<Vec<_>, _>>()?;
                PatternKind::Array {
                    elements,
                    rest: None,
                }
            }
            _ => {
                return Err(self.error(
                    ErrorCode::E1006,
                    "invalid assignment target",
                    node.span,
                ))
            }
        };
        Ok(self.arena.alloc_pattern(Pattern::new(kind, node.span)))
    }

    /// An operand begins on the current line (used after `return`).
    fn expression_follows_on_line(&self) -> bool {
        !self.cursor.at_line_start() && can_start_expression(self.cursor.current_kind())
    }
}
