//! Tags: headers, closing tags and tag bodies.
//!
//! A tag header `<name attr="v" attr={expr} flag>` is scanned as one raw
//! token (honoring quotes and braces so a `>` inside them does not end it);
//! [`parse_tag_header`] then splits it into name and attributes. Tag bodies
//! are scanned in content mode by [`Lexer::scan_tag_content`].

use std::ops::Range;
use std::sync::Arc;

use quill_ir::{LexErrorKind, Token, TokenKind};

use crate::scan::{brace_end, quoted_end};
use crate::Lexer;

impl Lexer {
    /// Tentatively read a tag at the `<` of `lt`.
    ///
    /// Returns `None` when the bytes after `<` cannot start a tag or the tag
    /// header never closes; the lexer position is then left unchanged.
    pub fn scan_tag(&mut self, lt: &Token) -> Option<Token> {
        let saved = self.pos;
        let start = lt.span.start as usize;
        match self.scan_tag_at(start) {
            Some(kind) => Some(self.make_token(kind, start, lt.newline_before)),
            None => {
                self.pos = saved;
                None
            }
        }
    }

    fn scan_tag_at(&mut self, start: usize) -> Option<TokenKind> {
        let index = Arc::clone(&self.index);
        let bytes = index.source().as_bytes().get(..self.end).unwrap_or_default();
        let next = *bytes.get(start + 1)?;

        match next {
            b'>' => {
                self.pos = start + 2;
                Some(TokenKind::TagStart(String::new()))
            }
            b'/' => {
                let close = start + 2 + bytes.get(start + 2..)?.iter().position(|&b| b == b'>')?;
                let name = self.slice(start + 2, close).trim().to_string();
                if !name.bytes().all(is_tag_name_byte) {
                    return None;
                }
                self.pos = close + 1;
                Some(TokenKind::TagEnd(name))
            }
            b'!' | b'?' => {
                let close = start + 2 + bytes.get(start + 2..)?.iter().position(|&b| b == b'>')?;
                self.pos = close + 1;
                Some(TokenKind::TagStart(self.slice(start + 1, close)))
            }
            b if b.is_ascii_alphabetic() => {
                let close = header_end(bytes, start + 1)?;
                self.pos = close + 1;
                Some(TokenKind::TagStart(self.slice(start + 1, close)))
            }
            _ => None,
        }
    }

    /// Scan the next piece of a tag body starting at `pos`.
    ///
    /// Yields `TagText`, `LBrace` (interpolation), `AtLBrace` (interpolation
    /// in raw-text mode), `TagStart` (nested tag), `TagEnd`, or `Eof`.
    ///
    /// `raw_tag` names the enclosing `<style>`/`<script>` element: inside
    /// it only `@{` interpolates and only its own closing tag ends the text.
    /// `//` comments are stripped in both modes unless directly preceded by
    /// `:` (so `https://` survives); `<!-- -->` comments are dropped.
    pub fn scan_tag_content(&mut self, pos: usize, raw_tag: Option<&str>) -> Token {
        self.pos = pos.min(self.end);
        let mut text = String::new();
        let mut text_start = self.pos;

        loop {
            if self.pos >= self.end {
                if let Some(token) = self.flush_text(&mut text, text_start) {
                    return token;
                }
                return self.make_token(TokenKind::Eof, self.pos, false);
            }

            let here = self.pos;
            let c = self.byte(here);
            let next = self.byte(here + 1);

            match c {
                b'<' if match raw_tag {
                    Some(name) => self.at_closing_tag(name),
                    None => starts_markup(next),
                } =>
                {
                    if self.starts_with("<!--") {
                        if self.skip_markup_comment() {
                            continue;
                        }
                        let kind = TokenKind::illegal(
                            LexErrorKind::UnterminatedComment,
                            "unterminated `<!--` comment",
                        );
                        return self.make_token(kind, here, false);
                    }
                    if let Some(token) = self.flush_text(&mut text, text_start) {
                        return token;
                    }
                    if let Some(kind) = self.scan_tag_at(here) {
                        return self.make_token(kind, here, false);
                    }
                    self.pos = self.end;
                    let kind = TokenKind::illegal(LexErrorKind::UnterminatedTag, "unterminated tag");
                    return self.make_token(kind, here, false);
                }
                b'{' if raw_tag.is_none() => {
                    if let Some(token) = self.flush_text(&mut text, text_start) {
                        return token;
                    }
                    self.pos = here + 1;
                    return self.make_token(TokenKind::LBrace, here, false);
                }
                b'@' if raw_tag.is_some() && next == b'{' => {
                    if let Some(token) = self.flush_text(&mut text, text_start) {
                        return token;
                    }
                    self.pos = here + 2;
                    return self.make_token(TokenKind::AtLBrace, here, false);
                }
                b'\\' if raw_tag.is_none() && matches!(next, b'{' | b'}') => {
                    if text.is_empty() {
                        text_start = here;
                    }
                    text.push(char::from(next));
                    self.pos = here + 2;
                }
                b'/' if next == b'/' && (here == 0 || self.byte(here - 1) != b':') => {
                    self.skip_line_comment();
                }
                _ => {
                    if text.is_empty() {
                        text_start = here;
                    }
                    let ch = self.char_at(here).unwrap_or('\u{FFFD}');
                    text.push(ch);
                    self.pos = here + ch.len_utf8();
                }
            }
        }
    }

    /// `</name` (case-insensitive) followed by `>` or whitespace.
    fn at_closing_tag(&self, name: &str) -> bool {
        let Some(rest) = self.index.source().get(self.pos..self.end) else {
            return false;
        };
        let Some(after) = rest.strip_prefix("</") else {
            return false;
        };
        after.len() >= name.len()
            && after.as_bytes()[..name.len()].eq_ignore_ascii_case(name.as_bytes())
            && after[name.len()..].starts_with(|c: char| c == '>' || c.is_whitespace())
    }

    /// Emit accumulated text as a `TagText` token, unless it is only
    /// formatting whitespace.
    fn flush_text(&mut self, text: &mut String, start: usize) -> Option<Token> {
        let raw = std::mem::take(text);
        let tidy = tidy_text(&raw)?;
        Some(self.make_token(TokenKind::TagText(tidy), start, false))
    }
}

/// Byte after `<` that starts markup in a tag body.
fn starts_markup(next: u8) -> bool {
    next.is_ascii_alphabetic() || matches!(next, b'/' | b'>' | b'!' | b'?')
}

fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}

/// Drop leading/trailing whitespace runs that contain a newline; those are
/// source formatting, not content. Returns `None` if nothing is left.
fn tidy_text(text: &str) -> Option<String> {
    let mut s = text;
    let trimmed = s.trim_start();
    if s[..s.len() - trimmed.len()].contains('\n') {
        s = trimmed;
    }
    let trimmed = s.trim_end();
    if s[trimmed.len()..].contains('\n') {
        s = trimmed;
    }
    (!s.is_empty()).then(|| s.to_string())
}

/// Index of the `>` ending a tag header; `i` is just past the `<`.
fn header_end(bytes: &[u8], mut i: usize) -> Option<usize> {
    while let Some(&c) = bytes.get(i) {
        match c {
            b'>' => return Some(i),
            b'"' => i = quoted_end(bytes, i + 1, b'"', true)?,
            b'\'' => i += 1 + bytes.get(i + 1..)?.iter().position(|&b| b == b'\'')?,
            b'{' => i = brace_end(bytes, i + 1)?,
            b'<' => return None,
            _ => {}
        }
        i += 1;
    }
    None
}

/// Shape of a tag header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagHeaderKind {
    Element,
    /// `<>`
    Fragment,
    /// `<!DOCTYPE html>` or `<?xml ...?>`
    Directive,
}

/// A tag header split into its parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagHeader {
    pub name: String,
    pub kind: TagHeaderKind,
    pub attrs: Vec<RawAttr>,
    pub self_closing: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawAttr {
    pub name: String,
    /// Absolute byte range of the attribute.
    pub span: Range<usize>,
    pub value: RawAttrValue,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawAttrValue {
    /// `disabled`
    Flag,
    /// `name="raw text"`; `start` is the absolute offset of the text.
    Text { raw: String, start: usize },
    /// `name={expr}`; absolute byte range of the expression.
    Expr { start: usize, end: usize },
}

/// Split the raw text of a `TagStart` token (between `<` and `>`), which
/// starts at absolute offset `offset`.
pub fn parse_tag_header(raw: &str, offset: usize) -> Result<TagHeader, String> {
    if raw.is_empty() {
        return Ok(TagHeader {
            name: String::new(),
            kind: TagHeaderKind::Fragment,
            attrs: Vec::new(),
            self_closing: false,
        });
    }
    if raw.starts_with('!') || raw.starts_with('?') {
        return Ok(TagHeader {
            name: raw.to_string(),
            kind: TagHeaderKind::Directive,
            attrs: Vec::new(),
            self_closing: true,
        });
    }

    let bytes = raw.as_bytes();
    let mut body_end = raw.trim_end().len();
    let self_closing = raw[..body_end].ends_with('/');
    if self_closing {
        body_end -= 1;
    }

    let name_len = bytes.iter().take_while(|&&b| is_tag_name_byte(b)).count();
    if name_len == 0 {
        return Err("expected tag name".to_string());
    }
    let name = raw[..name_len].to_string();

    let mut attrs = Vec::new();
    let mut i = name_len;
    loop {
        while i < body_end && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= body_end {
            break;
        }
        let attr_start = i;
        while i < body_end && (is_tag_name_byte(bytes[i]) || bytes[i] == b'@') {
            i += 1;
        }
        if i == attr_start {
            return Err(format!(
                "unexpected `{}` in tag `<{name}>`",
                raw[i..].chars().next().unwrap_or('?')
            ));
        }
        let attr_name = raw[attr_start..i].to_string();

        let mut j = i;
        while j < body_end && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        let value = if j < body_end && bytes[j] == b'=' {
            j += 1;
            while j < body_end && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            match bytes.get(j) {
                Some(b'"') => {
                    let close = quoted_end(bytes, j + 1, b'"', true)
                        .ok_or_else(|| format!("unterminated value for attribute `{attr_name}`"))?;
                    let value = RawAttrValue::Text {
                        raw: raw[j + 1..close].to_string(),
                        start: offset + j + 1,
                    };
                    i = close + 1;
                    value
                }
                Some(b'\'') => {
                    let close = raw[j + 1..]
                        .find('\'')
                        .map(|n| j + 1 + n)
                        .ok_or_else(|| format!("unterminated value for attribute `{attr_name}`"))?;
                    let value = RawAttrValue::Text {
                        raw: raw[j + 1..close].to_string(),
                        start: offset + j + 1,
                    };
                    i = close + 1;
                    value
                }
                Some(b'{') => {
                    let close = brace_end(bytes, j + 1)
                        .ok_or_else(|| format!("unclosed `{{` in attribute `{attr_name}`"))?;
                    i = close + 1;
                    RawAttrValue::Expr {
                        start: offset + j + 1,
                        end: offset + close,
                    }
                }
                _ => {
                    let end = (j..body_end)
                        .find(|&k| bytes[k].is_ascii_whitespace())
                        .unwrap_or(body_end);
                    if end == j {
                        return Err(format!("missing value for attribute `{attr_name}`"));
                    }
                    i = end;
                    RawAttrValue::Text {
                        raw: raw[j..end].to_string(),
                        start: offset + j,
                    }
                }
            }
        } else {
            RawAttrValue::Flag
        };

        attrs.push(RawAttr {
            name: attr_name,
            span: offset + attr_start..offset + i,
            value,
        });
    }

    Ok(TagHeader {
        name,
        kind: TagHeaderKind::Element,
        attrs,
        self_closing,
    })
}

#[cfg(test)]
mod tests;
