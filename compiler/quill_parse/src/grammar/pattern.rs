//! Destructuring patterns.
//!
//! ```text
//! pattern := IDENT
//!          | "[" (pattern ","?)* ("..." IDENT)? "]"
//!          | "{" (field ","?)* ("..." IDENT)? "}"
//! field   := key ("as" IDENT)? (":" pattern)? ("=" expr)?
//! key     := IDENT | STRING
//! ```

use quill_diagnostic::ErrorCode;
use quill_ir::{DictPatternField, ExprKind, Pattern, PatternId, PatternKind, TokenKind};

use crate::{ParseError, Parser};

impl Parser {
    pub(crate) fn parse_pattern(&mut self) -> Result<PatternId, ParseError> {
        self.nested(|p| {
            let token = p.cursor.current().clone();
            match &token.kind {
                TokenKind::Ident(name) => {
                    p.cursor.advance();
                    Ok(p.arena
                        .alloc_pattern(Pattern::new(PatternKind::Ident(name.clone()), token.span)))
                }
                TokenKind::LBracket => p.parse_array_pattern(),
                TokenKind::LBrace => p.parse_dict_pattern(),
                other => Err(p.error(
                    ErrorCode::E1005,
                    format!("expected a binding pattern, found {}", other.display_name()),
                    token.span,
                )),
            }
        })
    }

    fn parse_array_pattern(&mut self) -> Result<PatternId, ParseError> {
        let open = self.cursor.advance().span;
        let mut elements = Vec::new();
        let mut rest = None;
        while !self.cursor.check(&TokenKind::RBracket) && !self.cursor.is_at_end() {
            if self.cursor.check(&TokenKind::DotDotDot) {
                self.cursor.advance();
                rest = Some(self.expect_ident()?.0);
                self.eat_comma();
                break;
            }
            elements.push(self.parse_pattern()?);
            if !self.eat_comma() {
                break;
            }
        }
        let close = self.expect_closing(&TokenKind::RBracket, open)?;
        Ok(self.arena.alloc_pattern(Pattern::new(
            PatternKind::Array { elements, rest },
            open.merge(close),
        )))
    }

    fn parse_dict_pattern(&mut self) -> Result<PatternId, ParseError> {
        let open = self.cursor.advance().span;
        let mut fields = Vec::new();
        let mut rest = None;
        while !self.cursor.check(&TokenKind::RBrace) && !self.cursor.is_at_end() {
            if self.cursor.check(&TokenKind::DotDotDot) {
                self.cursor.advance();
                rest = Some(self.expect_ident()?.0);
                self.eat_comma();
                break;
            }
            fields.push(self.parse_pattern_field()?);
            if !self.eat_comma() {
                break;
            }
        }
        let close = self.expect_closing(&TokenKind::RBrace, open)?;
        Ok(self.arena.alloc_pattern(Pattern::new(
            PatternKind::Dict { fields, rest },
            open.merge(close),
        )))
    }

    fn parse_pattern_field(&mut self) -> Result<DictPatternField, ParseError> {
        let token = self.cursor.current().clone();
        let key = match &token.kind {
            TokenKind::Ident(name) => {
                self.cursor.advance();
                name.clone()
            }
            TokenKind::Str { raw, .. } => {
                self.cursor.advance();
                let key = self.parse_string(raw, token.span)?;
                match &self.arena.get_expr(key).kind {
                    ExprKind::Str(text) => text.clone(),
                    _ => {
                        return Err(self.error(
                            ErrorCode::E1005,
                            "pattern keys cannot be interpolated",
                            token.span,
                        ))
                    }
                }
            }
            other => {
                return Err(self.error(
                    ErrorCode::E1005,
                    format!("expected a key in dictionary pattern, found {}", other.display_name()),
                    token.span,
                ))
            }
        };

        let alias = match self.cursor.current_kind() {
            TokenKind::Ident(word) if word == "as" => {
                self.cursor.advance();
                Some(self.expect_ident()?.0)
            }
            _ => None,
        };
        let nested = if alias.is_none() && self.cursor.check(&TokenKind::Colon) {
            self.cursor.advance();
            Some(self.parse_pattern()?)
        } else {
            None
        };
        let default = if self.cursor.check(&TokenKind::Eq) {
            self.cursor.advance();
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(DictPatternField {
            key,
            alias,
            nested,
            default,
        })
    }

    fn eat_comma(&mut self) -> bool {
        if self.cursor.check(&TokenKind::Comma) {
            self.cursor.advance();
            true
        } else {
            false
        }
    }
}
