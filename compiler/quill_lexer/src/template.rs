//! Splitting string bodies into text and `{expr}` interpolations.
//!
//! Used for quoted strings, `@(...)` templates and quoted tag attribute
//! values. Escapes are resolved in text segments; interpolations are
//! returned as absolute byte ranges for the parser to sub-parse.

use std::fmt;

use quill_ir::LexErrorKind;

use crate::scan::brace_end;

/// A piece of a template body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawPart {
    Text(String),
    /// Absolute byte range of the expression between the braces.
    Expr { start: usize, end: usize },
}

/// A malformed escape or interpolation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateError {
    pub kind: LexErrorKind,
    pub message: String,
    /// Absolute byte offset of the problem.
    pub offset: usize,
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Split `raw` (which starts at absolute offset `offset`) into parts.
///
/// - `\n \t \r \0 \\ \" \` \' \{ \}` and `\u{hex}` are resolved
/// - unknown escapes are kept literally (`\d` stays `\d`, useful in regex text)
/// - `{expr}` becomes [`RawPart::Expr`]; `{}` with nothing inside stays literal
/// - a stray `}` is literal text
pub fn split_template(raw: &str, offset: usize) -> Result<Vec<RawPart>, TemplateError> {
    let bytes = raw.as_bytes();
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i = unescape_at(raw, i, offset, &mut text)?;
            }
            b'{' => {
                let Some(close) = brace_end(bytes, i + 1) else {
                    return Err(TemplateError {
                        kind: LexErrorKind::UnterminatedString,
                        message: "unclosed `{` in interpolation".to_string(),
                        offset: offset + i,
                    });
                };
                let inner = raw.get(i + 1..close).unwrap_or_default();
                if inner.trim().is_empty() {
                    text.push_str(raw.get(i..=close).unwrap_or_default());
                } else {
                    if !text.is_empty() {
                        parts.push(RawPart::Text(std::mem::take(&mut text)));
                    }
                    parts.push(RawPart::Expr {
                        start: offset + i + 1,
                        end: offset + close,
                    });
                }
                i = close + 1;
            }
            _ => {
                // Copy the whole run up to the next special byte at once.
                let run = bytes[i..]
                    .iter()
                    .position(|&b| b == b'\\' || b == b'{')
                    .map_or(bytes.len(), |n| i + n);
                text.push_str(raw.get(i..run).unwrap_or_default());
                i = run;
            }
        }
    }

    if !text.is_empty() || parts.is_empty() {
        parts.push(RawPart::Text(text));
    }
    Ok(parts)
}

/// Resolve the escape starting at `raw[i] == '\\'`, returning the index
/// after it.
fn unescape_at(raw: &str, i: usize, offset: usize, out: &mut String) -> Result<usize, TemplateError> {
    let Some(esc) = raw.get(i + 1..).and_then(|rest| rest.chars().next()) else {
        out.push('\\');
        return Ok(i + 1);
    };
    let resolved = match esc {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        '\\' | '"' | '`' | '\'' | '{' | '}' => esc,
        'u' => return unicode_escape(raw, i, offset, out),
        other => {
            out.push('\\');
            out.push(other);
            return Ok(i + 1 + other.len_utf8());
        }
    };
    out.push(resolved);
    Ok(i + 2)
}

/// `\u{1F600}`
fn unicode_escape(raw: &str, i: usize, offset: usize, out: &mut String) -> Result<usize, TemplateError> {
    let error = |message: &str| TemplateError {
        kind: LexErrorKind::InvalidEscape,
        message: message.to_string(),
        offset: offset + i,
    };
    let rest = raw.get(i + 2..).unwrap_or_default();
    let Some(body) = rest.strip_prefix('{') else {
        return Err(error("expected `{` after `\\u`"));
    };
    let Some(close) = body.find('}') else {
        return Err(error("unterminated `\\u{...}` escape"));
    };
    let hex = &body[..close];
    let ch = u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| error(&format!("invalid unicode escape `\\u{{{hex}}}`")))?;
    out.push(ch);
    // `\u{` + hex + `}`
    Ok(i + 3 + close + 1)
}

#[cfg(test)]
mod tests;
