//! Tags.
//!
//! A tag header arrives as one raw `TagStart` token and is split by
//! [`parse_tag_header`]. The body is read in content mode: text runs,
//! `{expr}` interpolations (`@{expr}` inside `<style>`/`<script>`), nested
//! tags, and finally the matching closing tag.
//!
//! Uppercase names are component calls; `<>...</>` is a fragment;
//! `<!DOCTYPE ...>` and `<?xml ...?>` are kept verbatim as directives.

use quill_diagnostic::ErrorCode;
use quill_ir::{ExprId, ExprKind, Span, TagAttr, TagAttrValue, TagKind, TagNode, TemplatePart, Token, TokenKind};
use quill_lexer::{parse_tag_header, RawAttrValue, TagHeaderKind};

use crate::{lex_error_code, ParseError, Parser};

/// Elements that never have a body, even without `/>`.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose body is raw text.
const RAW_TEXT_ELEMENTS: &[&str] = &["style", "script"];

impl Parser {
    /// Parse a tag whose header token is `header`. The returned node's span
    /// ends after the closing tag (or the header, for singletons); the
    /// caller resumes scanning from there.
    pub(crate) fn parse_tag(&mut self, header: &Token) -> Result<ExprId, ParseError> {
        let TokenKind::TagStart(raw) = &header.kind else {
            return Err(self.error(
                ErrorCode::E1001,
                format!("expected tag, found {}", header.kind.display_name()),
                header.span,
            ));
        };
        let parsed = parse_tag_header(raw, header.span.start as usize + 1)
            .map_err(|message| self.error(ErrorCode::E0007, message, header.span))?;

        let kind = match parsed.kind {
            TagHeaderKind::Directive => {
                let node = TagNode {
                    name: String::new(),
                    attrs: Vec::new(),
                    children: Vec::new(),
                    self_closing: true,
                    kind: TagKind::Directive(raw.clone()),
                };
                return Ok(self.alloc(ExprKind::Tag(node), header.span));
            }
            TagHeaderKind::Fragment => TagKind::Fragment,
            TagHeaderKind::Element if parsed.name.starts_with(|c: char| c.is_ascii_uppercase()) => {
                TagKind::Component
            }
            TagHeaderKind::Element => TagKind::Element,
        };

        let mut attrs = Vec::with_capacity(parsed.attrs.len());
        for attr in parsed.attrs {
            let value = match attr.value {
                RawAttrValue::Flag => TagAttrValue::Flag,
                RawAttrValue::Text { raw, start } => {
                    TagAttrValue::Text(self.parse_template_parts(&raw, start)?)
                }
                RawAttrValue::Expr { start, end } => TagAttrValue::Expr(self.parse_range(start, end)?),
            };
            attrs.push(TagAttr {
                name: attr.name,
                value,
            });
        }

        let is_void = matches!(kind, TagKind::Element)
            && VOID_ELEMENTS.contains(&parsed.name.to_ascii_lowercase().as_str());
        let self_closing = parsed.self_closing || is_void;
        let (children, span) = if self_closing {
            (Vec::new(), header.span)
        } else {
            let raw_tag = RAW_TEXT_ELEMENTS
                .iter()
                .find(|name| parsed.name.eq_ignore_ascii_case(name))
                .copied();
            let (children, close) = self.nested(|p| p.parse_tag_body(&parsed.name, raw_tag, header.span))?;
            (children, header.span.merge(close))
        };

        let node = TagNode {
            name: parsed.name,
            attrs,
            children,
            self_closing,
            kind,
        };
        Ok(self.alloc(ExprKind::Tag(node), span))
    }

    /// Read children up to and including the closing tag for `name`.
    /// Returns the children and the closing tag's span.
    fn parse_tag_body(
        &mut self,
        name: &str,
        raw_tag: Option<&str>,
        open: Span,
    ) -> Result<(Vec<TemplatePart>, Span), ParseError> {
        let mut children = Vec::new();
        let mut pos = open.end as usize;
        loop {
            self.cursor.scan_tag_content(pos, raw_tag);
            let token = self.cursor.current().clone();
            match token.kind {
                TokenKind::TagText(text) => {
                    children.push(TemplatePart::Text(text));
                    pos = token.span.end as usize;
                }
                TokenKind::LBrace | TokenKind::AtLBrace => {
                    self.cursor.advance();
                    if !self.cursor.check(&TokenKind::RBrace) {
                        children.push(TemplatePart::Expr(self.parse_expr_list()?));
                    }
                    let close = self.expect_closing(&TokenKind::RBrace, token.span)?;
                    pos = close.end as usize;
                }
                TokenKind::TagStart(_) => {
                    let child = self.parse_tag(&token)?;
                    children.push(TemplatePart::Expr(child));
                    pos = self.span_of(child).end as usize;
                }
                TokenKind::TagEnd(closing) => {
                    if !closing.eq_ignore_ascii_case(name) {
                        let expected = if name.is_empty() {
                            "`</>`".to_string()
                        } else {
                            format!("`</{name}>`")
                        };
                        return Err(self
                            .error(
                                ErrorCode::E1007,
                                format!("mismatched closing tag: expected {expected}, found `</{closing}>`"),
                                token.span,
                            )
                            .with_opener(open));
                    }
                    return Ok((children, token.span));
                }
                TokenKind::Illegal { kind, message } => {
                    return Err(self.error(lex_error_code(kind), message, token.span));
                }
                _ => {
                    let shown = if name.is_empty() { String::new() } else { format!(" `<{name}>`") };
                    return Err(self.error(
                        ErrorCode::E1003,
                        format!("unclosed tag{shown}: reached end of input"),
                        open,
                    ));
                }
            }
        }
    }
}
