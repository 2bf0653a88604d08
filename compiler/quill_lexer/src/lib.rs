//! Lexer for Quill.
//!
//! Quill's token stream is context sensitive: `/` may start a regex, `<`
//! may start a tag, and a tag body is text rather than code. The lexer
//! therefore does not pre-tokenize the whole file. The parser pulls tokens
//! one at a time with [`Lexer::next_token`] and, where the grammar says an
//! operand or tag content is expected, asks for a different reading of the
//! same bytes:
//!
//! - [`Lexer::rescan_regex`] turns a `/` in operand position into a regex literal
//! - [`Lexer::scan_tag`] turns a `<` in operand position into a tag header
//! - [`Lexer::scan_tag_content`] reads text, interpolations and nested tags
//!   inside a tag body (raw-text mode for `<style>`/`<script>`)
//!
//! Strings keep their raw contents; [`split_template`] resolves escapes and
//! locates `{expr}` interpolations so the parser can re-enter expression
//! parsing over those byte ranges with [`Lexer::with_range`].
//!
//! Malformed input never aborts lexing: it yields an `Illegal` token with a
//! message, which the parser turns into a diagnostic.

mod at_literal;
mod literals;
mod scan;
mod tag;
mod template;

use std::sync::Arc;

use quill_ir::{LexErrorKind, LineIndex, Position, Span, Token, TokenKind};

pub use at_literal::classify_template;
pub use tag::{parse_tag_header, RawAttr, RawAttrValue, TagHeader, TagHeaderKind};
pub use template::{split_template, RawPart, TemplateError};

/// Pull-based lexer over one source file (or a byte range of it).
///
/// Cloning is cheap (an `Arc` and two offsets), which the parser uses for
/// lookahead and snapshots.
#[derive(Clone, Debug)]
pub struct Lexer {
    index: Arc<LineIndex>,
    pos: usize,
    end: usize,
}

impl Lexer {
    /// Lex a standalone source string.
    pub fn new(source: &str) -> Self {
        Self::from_index(Arc::new(LineIndex::new(source)))
    }

    /// Lex the whole text of an existing line index.
    pub fn from_index(index: Arc<LineIndex>) -> Self {
        let end = index.source().len();
        Lexer { index, pos: 0, end }
    }

    /// Lex only `start..end` of the indexed source.
    ///
    /// Spans and positions stay relative to the whole file, so diagnostics
    /// inside interpolations point at the right place.
    pub fn with_range(index: Arc<LineIndex>, start: usize, end: usize) -> Self {
        let end = end.min(index.source().len());
        Lexer {
            index,
            pos: start.min(end),
            end,
        }
    }

    #[inline]
    pub fn line_index(&self) -> &Arc<LineIndex> {
        &self.index
    }

    /// Current byte offset.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// End of the range being lexed.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Move to `pos`; the next token is scanned from there.
    #[inline]
    pub fn reset(&mut self, pos: usize) {
        self.pos = pos.min(self.end);
    }

    /// Scan the next token in code mode.
    pub fn next_token(&mut self) -> Token {
        let (newline, unterminated_comment) = self.skip_trivia();
        if let Some(comment_start) = unterminated_comment {
            let kind = TokenKind::illegal(
                LexErrorKind::UnterminatedComment,
                "unterminated `<!--` comment",
            );
            return self.make_token(kind, comment_start, newline);
        }
        let start = self.pos;
        let kind = self.scan_token(start);
        self.make_token(kind, start, newline)
    }

    /// Look at the next token without consuming it.
    pub fn peek_token(&self) -> Token {
        self.clone().next_token()
    }

    fn scan_token(&mut self, start: usize) -> TokenKind {
        if start >= self.end {
            return TokenKind::Eof;
        }
        match self.byte(start) {
            b'0'..=b'9' => self.scan_number(),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_ident(),
            quote @ (b'"' | b'`') => self.scan_string(quote),
            b'@' => self.scan_at(),
            c => self.scan_punct(c),
        }
    }

    fn scan_punct(&mut self, c: u8) -> TokenKind {
        let next = self.byte(self.pos + 1);
        let (len, kind) = match c {
            b'+' if next == b'+' => (2, TokenKind::PlusPlus),
            b'+' => (1, TokenKind::Plus),
            b'-' => (1, TokenKind::Minus),
            b'*' => (1, TokenKind::Star),
            b'/' => (1, TokenKind::Slash),
            b'%' => (1, TokenKind::Percent),
            b'=' if self.starts_with("==>>") => (4, TokenKind::AppendArrow),
            b'=' if self.starts_with("==>") => (3, TokenKind::WriteArrow),
            b'=' if next == b'=' => (2, TokenKind::EqEq),
            b'=' => (1, TokenKind::Eq),
            b'!' if next == b'=' => (2, TokenKind::NotEq),
            b'!' if next == b'~' => (2, TokenKind::BangTilde),
            b'!' => (1, TokenKind::Bang),
            b'<' if self.starts_with("<==") => (3, TokenKind::ReadArrow),
            b'<' if next == b'=' => (2, TokenKind::LtEq),
            b'<' => (1, TokenKind::Lt),
            b'>' if next == b'=' => (2, TokenKind::GtEq),
            b'>' => (1, TokenKind::Gt),
            b'~' => (1, TokenKind::Tilde),
            b'.' if self.starts_with("...") => (3, TokenKind::DotDotDot),
            b'.' if next == b'.' => (2, TokenKind::DotDot),
            b'.' => (1, TokenKind::Dot),
            b'?' if next == b'?' => (2, TokenKind::Question2),
            b'|' if next == b'|' => (2, TokenKind::PipePipe),
            b'&' if next == b'&' => (2, TokenKind::AmpAmp),
            b',' => (1, TokenKind::Comma),
            b';' => (1, TokenKind::Semicolon),
            b':' => (1, TokenKind::Colon),
            b'(' => (1, TokenKind::LParen),
            b')' => (1, TokenKind::RParen),
            b'[' => (1, TokenKind::LBracket),
            b']' => (1, TokenKind::RBracket),
            b'{' => (1, TokenKind::LBrace),
            b'}' => (1, TokenKind::RBrace),
            _ => {
                let ch = self.char_at(self.pos).unwrap_or('\u{FFFD}');
                self.pos += ch.len_utf8().max(1);
                return TokenKind::illegal(
                    LexErrorKind::InvalidCharacter,
                    format!("unexpected character `{ch}`"),
                );
            }
        };
        self.pos += len;
        kind
    }

    /// Skip whitespace, `//` line comments and `<!-- -->` comments.
    ///
    /// Returns whether a newline was crossed, and the start of an
    /// unterminated `<!--` comment if one was hit.
    fn skip_trivia(&mut self) -> (bool, Option<usize>) {
        let mut newline = false;
        loop {
            match self.byte(self.pos) {
                b' ' | b'\t' | b'\r' if self.pos < self.end => self.pos += 1,
                b'\n' if self.pos < self.end => {
                    newline = true;
                    self.pos += 1;
                }
                b'/' if self.byte(self.pos + 1) == b'/' => self.skip_line_comment(),
                b'<' if self.starts_with("<!--") => {
                    let comment_start = self.pos;
                    if !self.skip_markup_comment() {
                        return (newline, Some(comment_start));
                    }
                }
                _ => return (newline, None),
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while self.pos < self.end && self.byte(self.pos) != b'\n' {
            self.pos += 1;
        }
    }

    /// Skip `<!-- ... -->` at the current position. Returns false (and moves
    /// to the end) when the comment is unterminated.
    fn skip_markup_comment(&mut self) -> bool {
        let index = Arc::clone(&self.index);
        let rest = index.source().get(self.pos + 4..self.end).unwrap_or("");
        match rest.find("-->") {
            Some(offset) => {
                self.pos += 4 + offset + 3;
                true
            }
            None => {
                self.pos = self.end;
                false
            }
        }
    }

    // ===== Byte access =====

    /// Byte at `at`, or `0` past the end of the lexed range.
    #[inline]
    fn byte(&self, at: usize) -> u8 {
        if at < self.end {
            self.index.source().as_bytes().get(at).copied().unwrap_or(0)
        } else {
            0
        }
    }

    fn char_at(&self, at: usize) -> Option<char> {
        self.index.source().get(at..self.end)?.chars().next()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.index
            .source()
            .get(self.pos..self.end)
            .is_some_and(|rest| rest.starts_with(prefix))
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.index
            .source()
            .get(start..end.min(self.end))
            .unwrap_or_default()
            .to_string()
    }

    fn position(&self, offset: usize) -> Position {
        self.index
            .position(u32::try_from(offset).unwrap_or(u32::MAX))
    }

    fn make_token(&self, kind: TokenKind, start: usize, newline_before: bool) -> Token {
        let mut token = Token::new(kind, Span::from_range(start..self.pos), self.position(start));
        token.newline_before = newline_before;
        token
    }
}

/// Lex `source` in code mode until end of input, including the final `Eof`.
///
/// Context-sensitive forms (regex, tags) are not resolved here since that
/// needs the parser; this is meant for token dumps and tests.
pub fn lex(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.is_eof();
        tokens.push(token);
        if done {
            tracing::trace!(count = tokens.len(), "lexed source");
            return tokens;
        }
    }
}

#[cfg(test)]
mod tests;
