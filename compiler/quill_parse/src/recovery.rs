//! Error recovery for the parser.
//!
//! After a failed statement the parser skips ahead to the next statement
//! boundary: a `;` or a token on a new line at bracket depth zero, a
//! statement keyword, or a closing brace that ends the enclosing block.

use quill_ir::TokenKind;

use crate::Parser;

/// Tokens that can only begin a statement-level construct.
pub fn starts_statement(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Let
            | TokenKind::Export
            | TokenKind::Return
            | TokenKind::Break
            | TokenKind::Continue
            | TokenKind::For
            | TokenKind::If
    )
}

impl Parser {
    /// Skip to the next statement boundary.
    ///
    /// Never consumes a closing bracket that is unbalanced within the
    /// skipped region, so an enclosing block still sees its `}`.
    pub(crate) fn synchronize(&mut self) {
        let start = self.cursor.current_span().start;
        let mut depth = 0usize;
        loop {
            let token = self.cursor.current();
            if token.is_eof() {
                return;
            }
            let moved = token.span.start != start;
            if depth == 0
                && moved
                && (token.newline_before || starts_statement(&token.kind))
            {
                return;
            }
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.cursor.advance();
                    return;
                }
                _ => {}
            }
            self.cursor.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use quill_ir::TokenKind;

    use super::starts_statement;
    use crate::Parser;

    #[test]
    fn statement_keywords() {
        assert!(starts_statement(&TokenKind::Let));
        assert!(starts_statement(&TokenKind::Return));
        assert!(!starts_statement(&TokenKind::Ident("x".into())));
    }

    #[test]
    fn stops_at_semicolon() {
        let mut p = Parser::new("a b ; c");
        p.synchronize();
        assert_eq!(p.cursor.current_kind(), &TokenKind::Ident("c".into()));
    }

    #[test]
    fn stops_at_newline_outside_brackets() {
        let mut p = Parser::new("a (b\n c) d\ne");
        p.synchronize();
        assert_eq!(p.cursor.current_kind(), &TokenKind::Ident("e".into()));
    }

    #[test]
    fn leaves_unbalanced_closer() {
        let mut p = Parser::new("a b } c");
        p.synchronize();
        assert!(p.cursor.check(&TokenKind::RBrace));
    }
}
