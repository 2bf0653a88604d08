//! Token types for the Quill lexer.
//!
//! Tokens are transient: the parser pulls them from the lexer one at a time
//! and re-scans when a context-sensitive construct (regex, tag, tag body)
//! needs a different reading of the same bytes.

use std::fmt;

use crate::ast::AtKind;
use crate::{Position, Span};

/// A token with its location in the source.
#[derive(Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub position: Position,
    /// A line break separates this token from the previous one; statement
    /// recovery resumes at such tokens.
    pub newline_before: bool,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span, position: Position) -> Self {
        Token {
            kind,
            span,
            position,
            newline_before: false,
        }
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.position)
    }
}

/// Token kinds for Quill.
///
/// String-bearing tokens keep their *raw* text: escapes and `{}`
/// interpolations are resolved by the parser, which re-enters expression
/// parsing for each interpolated segment.
#[derive(Clone, PartialEq)]
pub enum TokenKind {
    /// Integer literal: `42`, `1_000`
    Int(i64),
    /// Float literal (stored as bits so the kind stays `Eq`-friendly).
    Float(u64),
    /// Double-quoted or backtick string, raw contents between the delimiters.
    Str { raw: String, backtick: bool },
    /// Regex literal: `/pattern/flags`
    Regex { pattern: String, flags: String },
    /// `@`-literal: datetime, duration, path or URL text after the sigil.
    At { kind: AtKind, text: String },
    /// `@(...)` template; raw contents between the parentheses.
    AtTemplate { kind: AtKind, raw: String },

    /// Tag header `<name attrs>`, `<name attrs/>`, `<>`, `<!...>`, `<?...?>`;
    /// raw text between `<` and `>`.
    TagStart(String),
    /// Closing tag `</name>` or `</>`; the name (empty for fragments).
    TagEnd(String),
    /// A run of literal text inside a tag body.
    TagText(String),
    /// `@{` opening an interpolation in a raw-text tag body.
    AtLBrace,

    /// Identifier
    Ident(String),

    // Keywords
    Let,
    Export,
    Fn,
    Return,
    Break,
    Continue,
    If,
    Else,
    For,
    In,
    True,
    False,
    Null,
    And,
    Or,
    Not,
    Import,

    // Punctuation and operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Tilde,
    BangTilde,
    DotDot,
    DotDotDot,
    Question2,
    Bang,
    Eq,
    Dot,
    Comma,
    Colon,
    Semicolon,
    PipePipe,
    AmpAmp,
    /// `<==` read / error capture
    ReadArrow,
    /// `==>` write
    WriteArrow,
    /// `==>>` append
    AppendArrow,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    /// Malformed input; carries the diagnostic message.
    Illegal { kind: LexErrorKind, message: String },
    Eof,
}

/// What went wrong when the lexer produced an `Illegal` token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LexErrorKind {
    UnterminatedString,
    InvalidCharacter,
    InvalidNumber,
    InvalidEscape,
    UnterminatedRegex,
    InvalidAtLiteral,
    UnterminatedTag,
    UnterminatedComment,
}

impl TokenKind {
    /// Build an `Illegal` token kind.
    pub fn illegal(kind: LexErrorKind, message: impl Into<String>) -> TokenKind {
        TokenKind::Illegal {
            kind,
            message: message.into(),
        }
    }

    /// Look up a keyword by its source text.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        Some(match ident {
            "let" => TokenKind::Let,
            "export" => TokenKind::Export,
            "fn" => TokenKind::Fn,
            "return" => TokenKind::Return,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "in" => TokenKind::In,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "import" => TokenKind::Import,
            _ => return None,
        })
    }

    /// Short human-readable name used in "expected X, found Y" messages.
    pub fn display_name(&self) -> String {
        match self {
            TokenKind::Int(n) => format!("integer `{n}`"),
            TokenKind::Float(bits) => format!("float `{}`", f64::from_bits(*bits)),
            TokenKind::Str { .. } => "string".to_string(),
            TokenKind::Regex { .. } => "regex".to_string(),
            TokenKind::At { kind, .. } | TokenKind::AtTemplate { kind, .. } => {
                format!("{} literal", kind.as_str())
            }
            TokenKind::TagStart(_) => "tag".to_string(),
            TokenKind::TagEnd(name) => format!("`</{name}>`"),
            TokenKind::TagText(_) => "text".to_string(),
            TokenKind::Ident(name) => format!("identifier `{name}`"),
            TokenKind::Illegal { message, .. } => format!("invalid input ({message})"),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("`{}`", other.symbol()),
        }
    }

    /// Source text of fixed-spelling tokens.
    pub fn symbol(&self) -> &'static str {
        match self {
            TokenKind::Let => "let",
            TokenKind::Export => "export",
            TokenKind::Fn => "fn",
            TokenKind::Return => "return",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::For => "for",
            TokenKind::In => "in",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::Import => "import",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::PlusPlus => "++",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Tilde => "~",
            TokenKind::BangTilde => "!~",
            TokenKind::DotDot => "..",
            TokenKind::DotDotDot => "...",
            TokenKind::Question2 => "??",
            TokenKind::Bang => "!",
            TokenKind::Eq => "=",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::PipePipe => "||",
            TokenKind::AmpAmp => "&&",
            TokenKind::ReadArrow => "<==",
            TokenKind::WriteArrow => "==>",
            TokenKind::AppendArrow => "==>>",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::AtLBrace => "@{",
            _ => "",
        }
    }
}

impl fmt::Debug for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(n) => write!(f, "Int({n})"),
            TokenKind::Float(bits) => write!(f, "Float({})", f64::from_bits(*bits)),
            TokenKind::Str { raw, backtick } => {
                if *backtick {
                    write!(f, "Str(`{raw}`)")
                } else {
                    write!(f, "Str({raw:?})")
                }
            }
            TokenKind::Regex { pattern, flags } => write!(f, "Regex(/{pattern}/{flags})"),
            TokenKind::At { kind, text } => write!(f, "At({kind:?}, {text:?})"),
            TokenKind::AtTemplate { kind, raw } => write!(f, "AtTemplate({kind:?}, {raw:?})"),
            TokenKind::TagStart(raw) => write!(f, "TagStart(<{raw}>)"),
            TokenKind::TagEnd(name) => write!(f, "TagEnd(</{name}>)"),
            TokenKind::TagText(text) => write!(f, "TagText({text:?})"),
            TokenKind::Ident(name) => write!(f, "Ident({name})"),
            TokenKind::Illegal { kind, message } => write!(f, "Illegal({kind:?}: {message})"),
            TokenKind::Eof => write!(f, "Eof"),
            other => write!(f, "{}", other.symbol()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_resolve() {
        assert_eq!(TokenKind::keyword("let"), Some(TokenKind::Let));
        assert_eq!(TokenKind::keyword("import"), Some(TokenKind::Import));
        assert_eq!(TokenKind::keyword("lets"), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(TokenKind::Int(3).display_name(), "integer `3`");
        assert_eq!(TokenKind::ReadArrow.display_name(), "`<==`");
        assert_eq!(TokenKind::Eof.display_name(), "end of input");
        assert_eq!(
            TokenKind::illegal(LexErrorKind::InvalidCharacter, "unexpected `$`").display_name(),
            "invalid input (unexpected `$`)"
        );
    }
}
