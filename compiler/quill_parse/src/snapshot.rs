//! Parser snapshots for speculative parsing.
//!
//! Quill needs speculation in one place that plain lookahead cannot cover:
//! a statement starting with `{` or `[` is a destructuring pattern only if
//! the whole pattern is followed by `=` or `<==`. The parser snapshots,
//! tries the pattern, and restores if it was an expression after all.
//!
//! Arena state is not captured. Nodes allocated during a discarded attempt
//! stay in the arena unreferenced.

use quill_ir::Token;
use quill_lexer::Lexer;

use crate::Parser;

/// Saved cursor state plus the number of recorded errors.
#[derive(Clone, Debug)]
pub struct ParserSnapshot {
    lexer: Lexer,
    current: Token,
    prev_end: u32,
    error_count: usize,
}

impl Parser {
    pub(crate) fn snapshot(&self) -> ParserSnapshot {
        let (lexer, current, prev_end) = self.cursor.save();
        ParserSnapshot {
            lexer,
            current,
            prev_end,
            error_count: self.errors.len(),
        }
    }

    pub(crate) fn restore(&mut self, snapshot: ParserSnapshot) {
        self.cursor
            .restore((snapshot.lexer, snapshot.current, snapshot.prev_end));
        self.errors.truncate(snapshot.error_count);
    }

    /// Run `f`; keep its effects if it returns `Some`, otherwise rewind.
    pub(crate) fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let snapshot = self.snapshot();
        let result = f(self);
        if result.is_none() {
            self.restore(snapshot);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use quill_ir::TokenKind;

    use crate::Parser;

    #[test]
    fn failed_attempt_rewinds() {
        let mut p = Parser::new("a b c");
        let got: Option<()> = p.try_parse(|p| {
            p.cursor.advance();
            p.cursor.advance();
            None
        });
        assert!(got.is_none());
        assert_eq!(p.cursor.current_kind(), &TokenKind::Ident("a".into()));
    }

    #[test]
    fn successful_attempt_keeps_position() {
        let mut p = Parser::new("a b c");
        let got = p.try_parse(|p| Some(p.cursor.advance()));
        assert!(got.is_some());
        assert_eq!(p.cursor.current_kind(), &TokenKind::Ident("b".into()));
    }
}
