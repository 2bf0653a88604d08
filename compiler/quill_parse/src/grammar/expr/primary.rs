//! Primary expressions: literals, identifiers, grouping and the operands
//! that need a lexer rescan (regex, tags).

use quill_diagnostic::ErrorCode;
use quill_ir::{ExprId, ExprKind, TokenKind};

use crate::{lex_error_code, ParseError, Parser};

impl Parser {
    pub(crate) fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = self.cursor.current().clone();
        let span = token.span;
        let literal = match &token.kind {
            TokenKind::Int(n) => Some(ExprKind::Int(*n)),
            TokenKind::Float(bits) => Some(ExprKind::Float(f64::from_bits(*bits))),
            TokenKind::True => Some(ExprKind::Bool(true)),
            TokenKind::False => Some(ExprKind::Bool(false)),
            TokenKind::Null => Some(ExprKind::Null),
            TokenKind::Ident(name) => Some(ExprKind::Ident(name.clone())),
            TokenKind::At { kind, text } => Some(ExprKind::At {
                kind: *kind,
                text: text.clone(),
            }),
            _ => None,
        };
        if let Some(kind) = literal {
            self.cursor.advance();
            return Ok(self.alloc(kind, span));
        }

        match &token.kind {
            TokenKind::Str { raw, .. } => {
                self.cursor.advance();
                self.parse_string(raw, span)
            }
            TokenKind::AtTemplate { kind, raw } => {
                self.cursor.advance();
                self.parse_at_template(*kind, raw, span)
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr_list()?;
                self.expect_closing(&TokenKind::RParen, span)?;
                Ok(inner)
            }
            TokenKind::LBracket => self.parse_array(),
            TokenKind::LBrace => self.parse_dict(),
            TokenKind::Fn => self.parse_function(),
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::Import => {
                self.cursor.advance();
                let path = self.nested(Self::parse_primary)?;
                let span = span.merge(self.span_of(path));
                Ok(self.alloc(ExprKind::Import(path), span))
            }
            TokenKind::Slash => self.parse_regex(),
            TokenKind::Lt => self.parse_tag_operand(),
            TokenKind::Illegal { kind, message } => {
                Err(self.error(lex_error_code(*kind), message.clone(), span))
            }
            other => Err(self.error(
                ErrorCode::E1002,
                format!("expected expression, found {}", other.display_name()),
                span,
            )),
        }
    }

    /// `/` in operand position starts a regex literal.
    fn parse_regex(&mut self) -> Result<ExprId, ParseError> {
        self.cursor.rescan_regex();
        let token = self.cursor.advance();
        match token.kind {
            TokenKind::Regex { pattern, flags } => {
                Ok(self.alloc(ExprKind::Regex { pattern, flags }, token.span))
            }
            TokenKind::Illegal { kind, message } => {
                Err(self.error(lex_error_code(kind), message, token.span))
            }
            other => Err(self.error(
                ErrorCode::E1002,
                format!("expected regex literal, found {}", other.display_name()),
                token.span,
            )),
        }
    }

    /// `<` in operand position starts a tag; code resumes after it.
    fn parse_tag_operand(&mut self) -> Result<ExprId, ParseError> {
        if !self.cursor.rescan_tag() {
            let span = self.cursor.current_span();
            return Err(self.error(ErrorCode::E1002, "expected expression, found `<`", span));
        }
        let header = self.cursor.current().clone();
        if let TokenKind::TagEnd(name) = &header.kind {
            return Err(self.error(
                ErrorCode::E1007,
                format!("closing tag `</{name}>` has no matching opening tag"),
                header.span,
            ));
        }
        let tag = self.parse_tag(&header)?;
        self.cursor.resume_code(self.span_of(tag).end as usize);
        Ok(tag)
    }
}
