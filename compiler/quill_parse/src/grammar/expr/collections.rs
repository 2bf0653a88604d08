//! Array and dictionary literals.

use quill_ir::{DictEntry, ExprId, ExprKind, TokenKind};

use crate::{ParseError, Parser};

impl Parser {
    /// `[a, b, c]`. Elements are single expressions, so `[[1, 2], [3, 4]]`
    /// nests rather than flattening.
    pub(crate) fn parse_array(&mut self) -> Result<ExprId, ParseError> {
        let open = self.cursor.advance().span;
        self.nested(|p| {
            let mut items = Vec::new();
            while !p.cursor.check(&TokenKind::RBracket) && !p.cursor.is_at_end() {
                items.push(p.parse_expr()?);
                if !p.cursor.check(&TokenKind::Comma) {
                    break;
                }
                p.cursor.advance();
            }
            let close = p.expect_closing(&TokenKind::RBracket, open)?;
            Ok(p.alloc(ExprKind::Array(items), open.merge(close)))
        })
    }

    /// `{k: v, "k": v, [expr]: v, shorthand, ...spread}`.
    ///
    /// Entries are separated by commas or newlines.
    pub(crate) fn parse_dict(&mut self) -> Result<ExprId, ParseError> {
        let open = self.cursor.advance().span;
        self.nested(|p| {
            let mut entries = Vec::new();
            while !p.cursor.check(&TokenKind::RBrace) && !p.cursor.is_at_end() {
                entries.push(p.parse_dict_entry()?);
                if p.cursor.check(&TokenKind::Comma) {
                    p.cursor.advance();
                } else if !p.cursor.at_line_start() {
                    break;
                }
            }
            let close = p.expect_closing(&TokenKind::RBrace, open)?;
            Ok(p.alloc(ExprKind::Dict(entries), open.merge(close)))
        })
    }

    fn parse_dict_entry(&mut self) -> Result<DictEntry, ParseError> {
        let token = self.cursor.current().clone();
        match &token.kind {
            TokenKind::DotDotDot => {
                self.cursor.advance();
                Ok(DictEntry::Spread(self.parse_expr()?))
            }
            TokenKind::LBracket => {
                self.cursor.advance();
                let key = self.parse_expr()?;
                self.expect_closing(&TokenKind::RBracket, token.span)?;
                self.expect(&TokenKind::Colon)?;
                let value = self.parse_expr()?;
                Ok(DictEntry::Computed { key, value })
            }
            TokenKind::Ident(name) => {
                self.cursor.advance();
                if self.cursor.check(&TokenKind::Colon) {
                    self.cursor.advance();
                    let value = self.parse_expr()?;
                    return Ok(DictEntry::Field {
                        key: name.clone(),
                        value,
                    });
                }
                let value = self.alloc(ExprKind::Ident(name.clone()), token.span);
                Ok(DictEntry::Field {
                    key: name.clone(),
                    value,
                })
            }
            TokenKind::Str { raw, .. } => {
                self.cursor.advance();
                let key = self.parse_string(raw, token.span)?;
                self.expect(&TokenKind::Colon)?;
                let value = self.parse_expr()?;
                match &self.arena.get_expr(key).kind {
                    ExprKind::Str(text) => Ok(DictEntry::Field {
                        key: text.clone(),
                        value,
                    }),
                    _ => Ok(DictEntry::Computed { key, value }),
                }
            }
            TokenKind::Int(n) => {
                self.cursor.advance();
                self.expect(&TokenKind::Colon)?;
                let value = self.parse_expr()?;
                Ok(DictEntry::Field {
                    key: n.to_string(),
                    value,
                })
            }
            kind if kind.symbol().starts_with(|c: char| c.is_ascii_alphabetic()) => {
                // Keywords are valid keys: `{if: 1, in: 2}`.
                self.cursor.advance();
                self.expect(&TokenKind::Colon)?;
                let value = self.parse_expr()?;
                Ok(DictEntry::Field {
                    key: kind.symbol().to_string(),
                    value,
                })
            }
            _ => Err(self.unexpected("dictionary key")),
        }
    }
}
