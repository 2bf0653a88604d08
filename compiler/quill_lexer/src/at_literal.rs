//! `@` literals.
//!
//! One sigil covers five families. The body is classified by ordered
//! lookahead:
//!
//! 1. `scheme://` → URL
//! 2. `/`, `./`, `../`, `~/`, `-`, `stdin`, `stdout`, `stderr` → path
//! 3. `YYYY-MM-DD...` or `Thh:mm...` → datetime
//! 4. `1y2mo3w4d5h6m7s` (optionally negative) → duration
//!
//! `@(...)` is a template whose family is inferred from its leading text.

use std::sync::Arc;

use quill_ir::{AtKind, LexErrorKind, TokenKind};

use crate::scan::{is_ident_continue, is_literal_end, literal_run, paren_end};
use crate::Lexer;

impl Lexer {
    pub(crate) fn scan_at(&mut self) -> TokenKind {
        let body_start = self.pos + 1;
        let index = Arc::clone(&self.index);
        let bytes = index.source().as_bytes().get(..self.end).unwrap_or_default();
        let body = bytes.get(body_start..).unwrap_or_default();

        if body.first() == Some(&b'(') {
            return match paren_end(bytes, body_start + 1) {
                Some(close) => {
                    self.pos = close + 1;
                    let raw = self.slice(body_start + 1, close);
                    TokenKind::AtTemplate {
                        kind: classify_template(&raw),
                        raw,
                    }
                }
                None => {
                    self.pos = body_start + 1;
                    TokenKind::illegal(LexErrorKind::InvalidAtLiteral, "unclosed `@(` template")
                }
            };
        }

        if let Some((kind, len)) = classify_at(body) {
            self.pos = body_start + len;
            return TokenKind::At {
                kind,
                text: self.slice(body_start, body_start + len),
            };
        }

        let len = literal_run(body).max(1).min(body.len());
        self.pos = body_start + len;
        let text = self.slice(body_start, body_start + len);
        TokenKind::illegal(
            LexErrorKind::InvalidAtLiteral,
            format!("invalid `@` literal `@{text}`"),
        )
    }
}

/// Classify the body of an `@` literal, returning its family and length.
pub(crate) fn classify_at(body: &[u8]) -> Option<(AtKind, usize)> {
    if let Some(len) = url_len(body) {
        return Some((AtKind::Url, len));
    }
    if let Some(len) = path_len(body) {
        return Some((AtKind::Path, len));
    }
    if let Some(len) = datetime_len(body).or_else(|| time_len(body)) {
        return Some((AtKind::DateTime, len));
    }
    duration_len(body).map(|len| (AtKind::Duration, len))
}

/// Infer the family of an `@(...)` template from its leading literal text.
pub fn classify_template(raw: &str) -> AtKind {
    let bytes = raw.trim_start().as_bytes();
    if scheme_len(bytes).is_some() {
        AtKind::Url
    } else if has_path_prefix(bytes) {
        AtKind::Path
    } else if (digits(bytes, 0, 4) && bytes.get(4) == Some(&b'-'))
        || (bytes.first() == Some(&b'T') && clock_len(&bytes[1..]).is_some())
    {
        AtKind::DateTime
    } else if bytes.first().is_some_and(u8::is_ascii_digit)
        || (bytes.first() == Some(&b'-') && bytes.get(1).is_some_and(u8::is_ascii_digit))
    {
        AtKind::Duration
    } else {
        AtKind::Path
    }
}

fn at_end(body: &[u8], i: usize) -> bool {
    body.get(i).map_or(true, |&b| is_literal_end(b))
}

/// `scheme://`, returning the length including `://`.
fn scheme_len(body: &[u8]) -> Option<usize> {
    if !body.first()?.is_ascii_alphabetic() {
        return None;
    }
    let name = body
        .iter()
        .take_while(|&&b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
        .count();
    body.get(name..)?.starts_with(b"://").then_some(name + 3)
}

fn url_len(body: &[u8]) -> Option<usize> {
    let scheme = scheme_len(body)?;
    Some(scheme + literal_run(&body[scheme..]))
}

fn has_path_prefix(body: &[u8]) -> bool {
    body.starts_with(b"/") || body.starts_with(b"./") || body.starts_with(b"../") || body.starts_with(b"~/")
}

fn path_len(body: &[u8]) -> Option<usize> {
    if has_path_prefix(body) {
        return Some(literal_run(body));
    }
    for word in [&b"~"[..], b"..", b".", b"stdin", b"stdout", b"stderr"] {
        if body.starts_with(word) && at_end(body, word.len()) && !is_word_continued(body, word.len()) {
            return Some(word.len());
        }
    }
    // `@-` is stdin/stdout; `@-1d` is a negative duration
    if body.first() == Some(&b'-') && at_end(body, 1) {
        return Some(1);
    }
    None
}

/// Complete date/time followed by nothing, or by `.field` member access.
fn date_ends(body: &[u8], i: usize) -> bool {
    at_end(body, i)
        || (body.get(i) == Some(&b'.')
            && body.get(i + 1).is_some_and(|&b| b.is_ascii_alphabetic() || b == b'_'))
}

fn is_word_continued(body: &[u8], i: usize) -> bool {
    body.get(i).is_some_and(|&b| is_ident_continue(b))
}

fn digits(body: &[u8], i: usize, n: usize) -> bool {
    (i..i + n).all(|j| body.get(j).is_some_and(u8::is_ascii_digit))
}

/// `YYYY-MM-DD`
fn date_len(body: &[u8]) -> Option<usize> {
    (digits(body, 0, 4)
        && body.get(4) == Some(&b'-')
        && digits(body, 5, 2)
        && body.get(7) == Some(&b'-')
        && digits(body, 8, 2))
    .then_some(10)
}

/// `hh:mm[:ss[.fff]]`
fn clock_len(body: &[u8]) -> Option<usize> {
    if !(digits(body, 0, 2) && body.get(2) == Some(&b':') && digits(body, 3, 2)) {
        return None;
    }
    let mut len = 5;
    if body.get(5) == Some(&b':') && digits(body, 6, 2) {
        len = 8;
        if body.get(8) == Some(&b'.') && digits(body, 9, 1) {
            len = 9 + body[9..].iter().take_while(|b| b.is_ascii_digit()).count();
        }
    }
    Some(len)
}

/// `Z` or `+hh:mm` / `-hh:mm`
fn offset_len(body: &[u8]) -> usize {
    match body.first() {
        Some(b'Z') => 1,
        Some(b'+' | b'-') if digits(body, 1, 2) && body.get(3) == Some(&b':') && digits(body, 4, 2) => 6,
        _ => 0,
    }
}

fn datetime_len(body: &[u8]) -> Option<usize> {
    let mut len = date_len(body)?;
    if body.get(len) == Some(&b'T') {
        if let Some(clock) = clock_len(&body[len + 1..]) {
            len += 1 + clock;
            len += offset_len(&body[len..]);
        }
    }
    date_ends(body, len).then_some(len)
}

/// `@T10:30`
fn time_len(body: &[u8]) -> Option<usize> {
    if body.first() != Some(&b'T') {
        return None;
    }
    let mut len = 1 + clock_len(&body[1..])?;
    len += offset_len(&body[len..]);
    date_ends(body, len).then_some(len)
}

/// `-?(\d+(y|mo|w|d|h|m|s))+`
fn duration_len(body: &[u8]) -> Option<usize> {
    let mut i = usize::from(body.first() == Some(&b'-'));
    let mut components = 0;
    while body.get(i).is_some_and(u8::is_ascii_digit) {
        i += body[i..].iter().take_while(|b| b.is_ascii_digit()).count();
        let unit = if body[i..].starts_with(b"mo") {
            2
        } else if matches!(body.get(i), Some(b'y' | b'w' | b'd' | b'h' | b'm' | b's')) {
            1
        } else {
            return None;
        };
        i += unit;
        components += 1;
    }
    (components > 0 && !is_word_continued(body, i)).then_some(i)
}
