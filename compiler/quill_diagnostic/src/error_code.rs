use std::fmt;

macro_rules! error_codes {
    ($($(#[doc = $doc:literal])* $code:ident,)*) => {
        /// Error codes for all Quill diagnostics.
        ///
        /// Format: E#### where the first digit indicates the phase:
        /// - E0xxx: Lexer errors
        /// - E1xxx: Parser errors
        /// - E6xxx: Runtime errors
        /// - E7xxx: Module loading errors
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum ErrorCode {
            $($(#[doc = $doc])* $code,)*
        }

        impl ErrorCode {
            /// Every code, in numeric order.
            pub const ALL: &'static [ErrorCode] = &[$(ErrorCode::$code,)*];

            /// The code as a string (e.g., "E1001").
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(ErrorCode::$code => stringify!($code),)*
                }
            }

            /// One-line description of what the code means.
            pub fn description(self) -> &'static str {
                match self {
                    $(ErrorCode::$code => concat!($($doc),*).trim_start(),)*
                }
            }
        }
    };
}

error_codes! {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Invalid number literal
    E0003,
    /// Invalid escape sequence
    E0004,
    /// Unterminated regex literal
    E0005,
    /// Malformed `@` literal
    E0006,
    /// Unterminated tag
    E0007,
    /// Unterminated comment
    E0008,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Invalid pattern syntax
    E1005,
    /// Invalid assignment target
    E1006,
    /// Mismatched closing tag
    E1007,
    /// Expression nested too deeply
    E1008,

    // Runtime Errors (E6xxx)
    /// Undefined variable
    E6001,
    /// Type mismatch
    E6002,
    /// Wrong number of arguments
    E6003,
    /// Division by zero
    E6004,
    /// Index or key out of range
    E6005,
    /// Integer overflow
    E6006,
    /// Maximum call depth exceeded
    E6007,
    /// Permission denied
    E6008,
    /// Self-referential dictionary field
    E6009,
    /// Explicit failure raised by the program
    E6010,
    /// Value is not callable
    E6011,
    /// I/O failure
    E6012,
    /// Invalid value for the operation
    E6013,
    /// Control flow used outside its construct
    E6014,

    // Module Errors (E7xxx)
    /// Circular import
    E7001,
    /// Module not found
    E7002,
    /// Module failed to parse
    E7003,
}

/// Pipeline phase an error code belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Phase {
    Lexer,
    Parser,
    Runtime,
    Module,
}

impl ErrorCode {
    pub fn phase(self) -> Phase {
        match self.as_str().as_bytes().get(1) {
            Some(b'0') => Phase::Lexer,
            Some(b'1') => Phase::Parser,
            Some(b'6') => Phase::Runtime,
            _ => Phase::Module,
        }
    }

    /// Lexer and parser errors block evaluation.
    pub fn is_syntax_error(self) -> bool {
        matches!(self.phase(), Phase::Lexer | Phase::Parser)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a code like `"E6004"`, ignoring case.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_description() {
        assert_eq!(ErrorCode::E1001.to_string(), "E1001");
        assert_eq!(ErrorCode::E7001.as_str(), "E7001");
        assert_eq!(ErrorCode::E6004.description(), "Division by zero");
    }

    #[test]
    fn parse_ignores_case() {
        assert_eq!("e6004".parse::<ErrorCode>(), Ok(ErrorCode::E6004));
        assert_eq!("E7001".parse::<ErrorCode>(), Ok(ErrorCode::E7001));
        assert!("E5555".parse::<ErrorCode>().is_err());
        assert_eq!(ErrorCode::ALL.first(), Some(&ErrorCode::E0001));
    }

    #[test]
    fn phases() {
        assert_eq!(ErrorCode::E0001.phase(), Phase::Lexer);
        assert_eq!(ErrorCode::E1003.phase(), Phase::Parser);
        assert_eq!(ErrorCode::E6002.phase(), Phase::Runtime);
        assert_eq!(ErrorCode::E7002.phase(), Phase::Module);
        assert!(ErrorCode::E0005.is_syntax_error());
        assert!(!ErrorCode::E6001.is_syntax_error());
    }
}
