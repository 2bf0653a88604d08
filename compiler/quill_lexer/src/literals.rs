//! Numbers, identifiers, strings and regex literals.

use std::sync::Arc;

use quill_ir::{LexErrorKind, Token, TokenKind};

use crate::scan::{is_ident_continue, quoted_end};
use crate::Lexer;

impl Lexer {
    /// `123`, `1_000`, `3.14`, `1e3`, `2.5e-2`
    pub(crate) fn scan_number(&mut self) -> TokenKind {
        let start = self.pos;
        self.eat_digits();

        let mut is_float = false;
        // `1..5` is a range, not a float
        if self.byte(self.pos) == b'.' && self.byte(self.pos + 1).is_ascii_digit() {
            is_float = true;
            self.pos += 1;
            self.eat_digits();
        }
        if matches!(self.byte(self.pos), b'e' | b'E') {
            let mut exp = self.pos + 1;
            if matches!(self.byte(exp), b'+' | b'-') {
                exp += 1;
            }
            if self.byte(exp).is_ascii_digit() {
                is_float = true;
                self.pos = exp;
                self.eat_digits();
            }
        }

        let text: String = self
            .slice(start, self.pos)
            .chars()
            .filter(|&c| c != '_')
            .collect();
        if is_float {
            match text.parse::<f64>() {
                Ok(value) => TokenKind::Float(value.to_bits()),
                Err(_) => TokenKind::illegal(
                    LexErrorKind::InvalidNumber,
                    format!("invalid float literal `{text}`"),
                ),
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => TokenKind::Int(value),
                Err(_) => TokenKind::illegal(
                    LexErrorKind::InvalidNumber,
                    format!("integer literal `{text}` is too large"),
                ),
            }
        }
    }

    fn eat_digits(&mut self) {
        while self.byte(self.pos).is_ascii_digit() || self.byte(self.pos) == b'_' {
            self.pos += 1;
        }
    }

    pub(crate) fn scan_ident(&mut self) -> TokenKind {
        let start = self.pos;
        while is_ident_continue(self.byte(self.pos)) {
            self.pos += 1;
        }
        let text = self.slice(start, self.pos);
        TokenKind::keyword(&text).unwrap_or(TokenKind::Ident(text))
    }

    /// `"..."` or `` `...` ``; the token keeps the raw body.
    pub(crate) fn scan_string(&mut self, quote: u8) -> TokenKind {
        let body_start = self.pos + 1;
        let index = Arc::clone(&self.index);
        let bytes = index.source().as_bytes().get(..self.end).unwrap_or_default();
        match quoted_end(bytes, body_start, quote, quote == b'`') {
            Some(close) => {
                self.pos = close + 1;
                TokenKind::Str {
                    raw: self.slice(body_start, close),
                    backtick: quote == b'`',
                }
            }
            None => {
                // Recover at the end of the line so the rest of the file still lexes.
                self.pos = body_start;
                while self.pos < self.end && self.byte(self.pos) != b'\n' {
                    self.pos += 1;
                }
                TokenKind::illegal(LexErrorKind::UnterminatedString, "unterminated string literal")
            }
        }
    }

    /// Re-read a `/` token as the start of a regex literal `/pattern/flags`.
    ///
    /// Called by the parser when `/` appears where an operand is expected.
    pub fn rescan_regex(&mut self, slash: &Token) -> Token {
        let start = slash.span.start as usize;
        self.pos = start + 1;
        let body_start = self.pos;
        let mut in_class = false;
        loop {
            if self.pos >= self.end || self.byte(self.pos) == b'\n' {
                let kind =
                    TokenKind::illegal(LexErrorKind::UnterminatedRegex, "unterminated regex literal");
                return self.make_token(kind, start, slash.newline_before);
            }
            match self.byte(self.pos) {
                b'\\' => self.pos = (self.pos + 2).min(self.end),
                b'[' => {
                    in_class = true;
                    self.pos += 1;
                }
                b']' => {
                    in_class = false;
                    self.pos += 1;
                }
                b'/' if !in_class => break,
                _ => self.pos += 1,
            }
        }
        let pattern = self.slice(body_start, self.pos);
        self.pos += 1;

        let flags_start = self.pos;
        while self.byte(self.pos).is_ascii_alphabetic() {
            self.pos += 1;
        }
        let flags = self.slice(flags_start, self.pos);
        let kind = match flags.chars().find(|c| !"imsx".contains(*c)) {
            Some(bad) => TokenKind::illegal(
                LexErrorKind::InvalidCharacter,
                format!("unknown regex flag `{bad}`"),
            ),
            None => TokenKind::Regex { pattern, flags },
        };
        self.make_token(kind, start, slash.newline_before)
    }
}
