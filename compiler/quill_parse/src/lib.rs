//! Recursive descent parser for Quill.
//!
//! Produces a flat AST in an [`ExprArena`]. Statements use recursive
//! descent; expressions use precedence climbing over
//! [`BinaryOp::precedence`](quill_ir::BinaryOp::precedence).
//!
//! The parser drives the lexer: it pulls one token at a time and, where the
//! grammar expects an operand, asks the lexer to re-read `/` as a regex or
//! `<` as a tag. Tag bodies are read in content mode, and string
//! interpolations are parsed by running a second cursor over the byte range
//! of each `{expr}`.
//!
//! Parsing never stops at the first error. Each failed statement records a
//! [`ParseError`] and the parser resynchronizes at the next statement
//! boundary.

mod cursor;
pub mod dump;
mod error;
mod grammar;
mod recovery;
mod snapshot;

use std::sync::Arc;

use quill_diagnostic::ErrorCode;
use quill_ir::{Expr, ExprArena, ExprId, ExprKind, LineIndex, Program, Span, StmtId, TokenKind};
use quill_lexer::Lexer;
use quill_stack::{ensure_sufficient_stack, DepthLimit};

pub use cursor::Cursor;
pub use error::{lex_error_code, ParseError};
pub use snapshot::ParserSnapshot;

/// Default bound on syntactic nesting (parenthesized expressions, nested
/// literals, blocks, tags).
pub const DEFAULT_MAX_NESTING: usize = 1000;

/// Result of parsing one source file.
#[derive(Clone, Debug)]
pub struct ParseOutput {
    pub program: Program,
    pub arena: ExprArena,
    pub errors: Vec<ParseError>,
    pub line_index: Arc<LineIndex>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse `source` with default limits.
pub fn parse(source: &str) -> ParseOutput {
    Parser::new(source).parse_program()
}

/// Parser state.
pub struct Parser {
    cursor: Cursor,
    arena: ExprArena,
    errors: Vec<ParseError>,
    depth: DepthLimit,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self::from_index(Arc::new(LineIndex::new(source)))
    }

    pub fn from_index(index: Arc<LineIndex>) -> Self {
        let arena = ExprArena::with_capacity(index.source().len());
        Parser {
            cursor: Cursor::new(Lexer::from_index(index)),
            arena,
            errors: Vec::new(),
            depth: DepthLimit::new(DEFAULT_MAX_NESTING),
        }
    }

    /// Override the nesting limit.
    #[must_use]
    pub fn with_max_nesting(mut self, max: usize) -> Self {
        self.depth = DepthLimit::new(max);
        self
    }

    /// Parse a whole file.
    pub fn parse_program(mut self) -> ParseOutput {
        let stmts = self.parse_statements(false);
        tracing::debug!(
            statements = stmts.len(),
            exprs = self.arena.expr_count(),
            errors = self.errors.len(),
            "parsed program"
        );
        ParseOutput {
            program: Program { stmts },
            arena: self.arena,
            errors: self.errors,
            line_index: Arc::clone(self.cursor.line_index()),
        }
    }

    /// Parse statements until end of input, or until `}` inside a block.
    pub(crate) fn parse_statements(&mut self, in_block: bool) -> Vec<StmtId> {
        let mut stmts = Vec::new();
        loop {
            while self.cursor.check(&TokenKind::Semicolon) {
                self.cursor.advance();
            }
            if self.cursor.is_at_end() || (in_block && self.cursor.check(&TokenKind::RBrace)) {
                return stmts;
            }

            let start = self.cursor.current_span().start;
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(error) => {
                    tracing::trace!(%error, "statement failed, resynchronizing");
                    let failed_at = error.span.start;
                    self.errors.push(error);
                    self.synchronize();
                    // Resync stops in front of an unbalanced closer; if that
                    // closer is what failed, step over it or it fails again.
                    let here = self.cursor.current_span().start;
                    let stuck = here == start || here == failed_at;
                    let at_block_end = in_block && self.cursor.check(&TokenKind::RBrace);
                    if stuck && !self.cursor.is_at_end() && !at_block_end {
                        self.cursor.advance();
                    }
                }
            }
        }
    }

    // ===== Errors =====

    pub(crate) fn error(&self, code: ErrorCode, message: impl Into<String>, span: Span) -> ParseError {
        ParseError::new(code, message, span, self.cursor.position_of(span))
    }

    /// "expected X, found Y" at the current token.
    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.cursor.current();
        if let TokenKind::Illegal { kind, message } = &token.kind {
            return self.error(lex_error_code(*kind), message.clone(), token.span);
        }
        self.error(
            ErrorCode::E1001,
            format!("expected {expected}, found {}", token.kind.display_name()),
            token.span,
        )
    }

    /// Consume a token of `kind` or fail.
    pub(crate) fn expect(&mut self, kind: &TokenKind) -> Result<Span, ParseError> {
        if self.cursor.check(kind) {
            Ok(self.cursor.advance().span)
        } else {
            Err(self.unexpected(&format!("`{}`", kind.symbol())))
        }
    }

    /// Consume the closer of a bracket opened at `open`.
    pub(crate) fn expect_closing(&mut self, kind: &TokenKind, open: Span) -> Result<Span, ParseError> {
        if self.cursor.check(kind) {
            return Ok(self.cursor.advance().span);
        }
        if let TokenKind::Illegal { .. } = self.cursor.current_kind() {
            return Err(self.unexpected(kind.symbol()));
        }
        let found = self.cursor.current().kind.display_name();
        let opener = match kind {
            TokenKind::RParen => '(',
            TokenKind::RBracket => '[',
            _ => '{',
        };
        let span = self.cursor.current_span();
        Err(self
            .error(
                ErrorCode::E1003,
                format!(
                    "unclosed `{opener}` opened at {}: expected `{}`, found {found}",
                    self.cursor.position_of(open),
                    kind.symbol()
                ),
                span,
            )
            .with_opener(open))
    }

    pub(crate) fn expect_ident(&mut self) -> Result<(String, Span), ParseError> {
        if let TokenKind::Ident(name) = self.cursor.current_kind() {
            let name = name.clone();
            let span = self.cursor.advance().span;
            return Ok((name, span));
        }
        let mut err = self.unexpected("identifier");
        if err.code == ErrorCode::E1001 {
            err.code = ErrorCode::E1004;
        }
        Err(err)
    }

    // ===== Nodes =====

    pub(crate) fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, span))
    }

    #[inline]
    pub(crate) fn span_of(&self, id: ExprId) -> Span {
        self.arena.get_expr(id).span
    }

    /// Run `f` one nesting level deeper, failing with E1008 past the limit.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if let Err(exceeded) = self.depth.enter() {
            return Err(self.error(
                ErrorCode::E1008,
                format!("expression nested too deeply ({exceeded})"),
                self.cursor.current_span(),
            ));
        }
        let result = ensure_sufficient_stack(|| f(self));
        self.depth.exit();
        result
    }
}

#[cfg(test)]
mod tests;
