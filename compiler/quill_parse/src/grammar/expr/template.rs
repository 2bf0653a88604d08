//! Strings, `@(...)` templates and other interpolated text.
//!
//! The lexer hands over raw string contents; [`split_template`] resolves
//! escapes and reports each `{expr}` as an absolute byte range, which is
//! parsed here with a sub-cursor over just that range.

use std::sync::Arc;

use quill_diagnostic::ErrorCode;
use quill_ir::{AtKind, ExprId, ExprKind, Span, TemplatePart};
use quill_lexer::{split_template, Lexer, RawPart};

use crate::cursor::Cursor;
use crate::{lex_error_code, ParseError, Parser};

impl Parser {
    /// `"text {expr} text"`; the raw contents start one byte into `span`.
    pub(crate) fn parse_string(&mut self, raw: &str, span: Span) -> Result<ExprId, ParseError> {
        let parts = self.parse_template_parts(raw, span.start as usize + 1)?;
        let kind = match as_plain_text(&parts) {
            Some(text) => ExprKind::Str(text),
            None => ExprKind::Template(parts),
        };
        Ok(self.alloc(kind, span))
    }

    /// `@(./data/{name}.json)`; the raw contents start after `@(`.
    pub(crate) fn parse_at_template(
        &mut self,
        kind: AtKind,
        raw: &str,
        span: Span,
    ) -> Result<ExprId, ParseError> {
        let parts = self.parse_template_parts(raw, span.start as usize + 2)?;
        Ok(self.alloc(ExprKind::AtTemplate { kind, parts }, span))
    }

    /// Split `raw` (at absolute `offset`) and parse its interpolations.
    pub(crate) fn parse_template_parts(
        &mut self,
        raw: &str,
        offset: usize,
    ) -> Result<Vec<TemplatePart>, ParseError> {
        let pieces = split_template(raw, offset).map_err(|err| {
            let at = u32::try_from(err.offset).unwrap_or(u32::MAX);
            self.error(lex_error_code(err.kind), err.message, Span::new(at, at.saturating_add(1)))
        })?;
        pieces
            .into_iter()
            .map(|piece| match piece {
                RawPart::Text(text) => Ok(TemplatePart::Text(text)),
                RawPart::Expr { start, end } => Ok(TemplatePart::Expr(self.parse_range(start, end)?)),
            })
            .collect()
    }

    /// Parse the source bytes `start..end` as one expression list.
    ///
    /// Spans stay file-relative. Errors inside the range are returned, not
    /// recorded, so the enclosing statement fails as a unit.
    pub(crate) fn parse_range(&mut self, start: usize, end: usize) -> Result<ExprId, ParseError> {
        let index = Arc::clone(self.cursor.line_index());
        let sub = Cursor::new(Lexer::with_range(index, start, end));
        let outer = std::mem::replace(&mut self.cursor, sub);
        let result = self.parse_range_inner();
        self.cursor = outer;
        result
    }

    fn parse_range_inner(&mut self) -> Result<ExprId, ParseError> {
        let expr = self.parse_expr_list()?;
        if self.cursor.is_at_end() {
            Ok(expr)
        } else {
            let token = self.cursor.current();
            Err(self.error(
                ErrorCode::E1001,
                format!(
                    "expected `}}` to end interpolation, found {}",
                    token.kind.display_name()
                ),
                token.span,
            ))
        }
    }
}

/// Text of a template with no interpolations.
fn as_plain_text(parts: &[TemplatePart]) -> Option<String> {
    let mut text = String::new();
    for part in parts {
        match part {
            TemplatePart::Text(t) => text.push_str(t),
            TemplatePart::Expr(_) => return None,
        }
    }
    Some(text)
}
