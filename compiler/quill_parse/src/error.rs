//! Parse error type.
//!
//! Errors are collected rather than thrown: the parser records one
//! [`ParseError`] per failed statement and resynchronizes, so a single pass
//! reports every independent problem in the file.

use std::fmt;

use quill_diagnostic::{Diagnostic, ErrorCode};
use quill_ir::{LexErrorKind, Position, Span};

/// A syntax error with its location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    /// 1-based line/column of `span.start`.
    pub position: Position,
    /// The bracket an unclosed-delimiter error refers back to.
    pub opened_at: Option<Span>,
}

impl ParseError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span, position: Position) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            position,
            opened_at: None,
        }
    }

    #[must_use]
    pub fn with_opener(mut self, open: Span) -> Self {
        self.opened_at = Some(open);
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::new(self.code, self.message.clone());
        let diagnostic = match self.opened_at {
            Some(open) => diagnostic.with_context(open, "opened here"),
            None => diagnostic,
        };
        diagnostic.with_label(self.span, self.code.description())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Error code for a malformed token reported by the lexer.
pub fn lex_error_code(kind: LexErrorKind) -> ErrorCode {
    match kind {
        LexErrorKind::UnterminatedString => ErrorCode::E0001,
        LexErrorKind::InvalidCharacter => ErrorCode::E0002,
        LexErrorKind::InvalidNumber => ErrorCode::E0003,
        LexErrorKind::InvalidEscape => ErrorCode::E0004,
        LexErrorKind::UnterminatedRegex => ErrorCode::E0005,
        LexErrorKind::InvalidAtLiteral => ErrorCode::E0006,
        LexErrorKind::UnterminatedTag => ErrorCode::E0007,
        LexErrorKind::UnterminatedComment => ErrorCode::E0008,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position() {
        let err = ParseError::new(
            ErrorCode::E1002,
            "expected expression, found `)`",
            Span::new(4, 5),
            Position::new(2, 3),
        );
        assert_eq!(err.to_string(), "2:3: expected expression, found `)`");
    }

    #[test]
    fn lex_codes_are_lexer_phase() {
        assert_eq!(lex_error_code(LexErrorKind::UnterminatedRegex), ErrorCode::E0005);
        assert!(lex_error_code(LexErrorKind::InvalidAtLiteral).is_syntax_error());
    }

    #[test]
    fn diagnostic_keeps_code_and_span() {
        let err = ParseError::new(ErrorCode::E1004, "expected identifier", Span::new(1, 3), Position::new(1, 2));
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E1004);
        assert_eq!(diag.primary_span(), Some(Span::new(1, 3)));
        assert_eq!(diag.labels.len(), 1);
    }

    #[test]
    fn unclosed_delimiter_labels_the_opener() {
        let err = ParseError::new(ErrorCode::E1003, "unclosed `[`", Span::new(8, 9), Position::new(2, 1))
            .with_opener(Span::new(0, 1));
        let diag = err.to_diagnostic();
        assert_eq!(diag.primary_span(), Some(Span::new(8, 9)));
        assert_eq!(diag.labels[0].span, Span::new(0, 1));
        assert_eq!(diag.labels[0].message, "opened here");
    }
}
