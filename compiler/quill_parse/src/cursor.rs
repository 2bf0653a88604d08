//! Token cursor over the pull-based lexer.
//!
//! The cursor holds exactly one token, `current`; the lexer sits just past
//! it. Because Quill's lexing depends on grammar context, the cursor never
//! buffers ahead: lookahead clones the lexer, and context switches (regex,
//! tags, tag bodies) re-read bytes starting at `current`.

use std::mem::discriminant;
use std::sync::Arc;

use quill_ir::{LineIndex, Position, Span, Token, TokenKind};
use quill_lexer::Lexer;

pub struct Cursor {
    lexer: Lexer,
    current: Token,
    /// End of the last consumed token.
    prev_end: u32,
}

impl Cursor {
    /// Create a cursor positioned at the first token.
    pub fn new(mut lexer: Lexer) -> Self {
        let prev_end = u32::try_from(lexer.pos()).unwrap_or(u32::MAX);
        let current = lexer.next_token();
        Cursor {
            lexer,
            current,
            prev_end,
        }
    }

    #[inline]
    pub fn current(&self) -> &Token {
        &self.current
    }

    #[inline]
    pub fn current_kind(&self) -> &TokenKind {
        &self.current.kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current.span
    }

    /// Span of the most recently consumed token's end (zero-length).
    #[inline]
    pub fn previous_end(&self) -> Span {
        Span::point(self.prev_end)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current.is_eof()
    }

    /// Whether `current` has the same kind as `kind`, ignoring payloads.
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        discriminant(&self.current.kind) == discriminant(kind)
    }

    #[inline]
    pub fn check_ident(&self) -> bool {
        matches!(self.current.kind, TokenKind::Ident(_))
    }

    /// A newline separates `current` from the previous token.
    #[inline]
    pub fn at_line_start(&self) -> bool {
        self.current.newline_before
    }

    /// Consume `current` and return it.
    pub fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        let old = std::mem::replace(&mut self.current, next);
        self.prev_end = old.span.end;
        old
    }

    /// The token after `current`, read in code mode.
    pub fn peek(&self) -> Token {
        self.lexer.peek_token()
    }

    pub fn line_index(&self) -> &Arc<LineIndex> {
        self.lexer.line_index()
    }

    pub fn position_of(&self, span: Span) -> Position {
        self.lexer.line_index().span_start(span)
    }

    // ===== Context switches =====

    /// Re-read a `/` in operand position as a regex literal.
    pub fn rescan_regex(&mut self) {
        let slash = self.current.clone();
        self.current = self.lexer.rescan_regex(&slash);
    }

    /// Re-read a `<` in operand position as a tag. Returns false (leaving
    /// the cursor unchanged) when no tag starts here.
    pub fn rescan_tag(&mut self) -> bool {
        let lt = self.current.clone();
        match self.lexer.scan_tag(&lt) {
            Some(token) => {
                self.current = token;
                true
            }
            None => false,
        }
    }

    /// Whether the `<` at `current` would read as a tag header.
    pub fn lt_starts_tag(&self) -> bool {
        let mut lookahead = self.lexer.clone();
        matches!(
            lookahead.scan_tag(&self.current).map(|t| t.kind),
            Some(TokenKind::TagStart(_))
        )
    }

    /// Make `current` the next piece of a tag body starting at `pos`.
    pub fn scan_tag_content(&mut self, pos: usize, raw_tag: Option<&str>) {
        self.prev_end = u32::try_from(pos).unwrap_or(u32::MAX);
        self.current = self.lexer.scan_tag_content(pos, raw_tag);
    }

    /// Continue in code mode from byte offset `pos`.
    pub fn resume_code(&mut self, pos: usize) {
        self.prev_end = u32::try_from(pos).unwrap_or(u32::MAX);
        self.lexer.reset(pos);
        self.current = self.lexer.next_token();
    }

    pub(crate) fn save(&self) -> (Lexer, Token, u32) {
        (self.lexer.clone(), self.current.clone(), self.prev_end)
    }

    pub(crate) fn restore(&mut self, (lexer, current, prev_end): (Lexer, Token, u32)) {
        self.lexer = lexer;
        self.current = current;
        self.prev_end = prev_end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(source: &str) -> Cursor {
        Cursor::new(Lexer::new(source))
    }

    #[test]
    fn advance_returns_consumed_token() {
        let mut c = cursor("a + b");
        let a = c.advance();
        assert_eq!(a.kind, TokenKind::Ident("a".into()));
        assert!(c.check(&TokenKind::Plus));
        assert_eq!(c.previous_end(), Span::point(1));
    }

    #[test]
    fn check_ignores_payload() {
        let c = cursor("foo");
        assert!(c.check(&TokenKind::Ident(String::new())));
        assert!(c.check_ident());
    }

    #[test]
    fn peek_does_not_consume() {
        let c = cursor("x = 1");
        assert_eq!(c.peek().kind, TokenKind::Eq);
        assert!(c.check_ident());
    }

    #[test]
    fn rescan_regex_replaces_slash() {
        let mut c = cursor("/a+/i");
        c.rescan_regex();
        assert_eq!(
            c.current_kind(),
            &TokenKind::Regex {
                pattern: "a+".into(),
                flags: "i".into()
            }
        );
        c.advance();
        assert!(c.is_at_end());
    }

    #[test]
    fn rescan_tag_falls_back() {
        let mut c = cursor("< 3");
        assert!(!c.lt_starts_tag());
        assert!(!c.rescan_tag());
        assert!(c.check(&TokenKind::Lt));

        let mut c = cursor("<b>");
        assert!(c.lt_starts_tag());
        assert!(c.rescan_tag());
        assert_eq!(c.current_kind(), &TokenKind::TagStart("b".into()));
    }

    #[test]
    fn save_and_restore() {
        let mut c = cursor("a b c");
        let saved = c.save();
        c.advance();
        c.advance();
        c.restore(saved);
        assert_eq!(c.current_kind(), &TokenKind::Ident("a".into()));
    }
}
