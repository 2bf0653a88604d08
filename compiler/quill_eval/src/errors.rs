//! Runtime errors and control flow.
//!
//! Evaluation returns [`EvalResult`]. The error side is a [`ControlAction`]:
//! either a real [`EvalError`] or a `return`/`break`/`continue` signal
//! travelling to the construct that consumes it. Both propagate with `?`,
//! so every sequencing rule re-propagates control flow for free.
//!
//! Factory functions (`division_by_zero()`, `undefined_variable(name)`, ...)
//! are the public way to build errors; each sets a structured
//! [`EvalErrorKind`] and the matching message.

use std::fmt;
use std::path::{Path, PathBuf};

use quill_diagnostic::{Diagnostic, ErrorCode};
use quill_ir::{BinaryOp, LineIndex, Position, Span};

use crate::value::Value;

/// Result of evaluating an expression or statement.
pub type EvalResult<T = Value> = Result<T, ControlAction>;

/// Non-local exits out of expression evaluation.
#[derive(Clone, Debug)]
pub enum ControlAction {
    Error(Box<EvalError>),
    /// `return`, unwrapped at the function-call boundary.
    Return(Value),
    /// `break`, consumed by the nearest `for`.
    Break,
    /// `continue`, consumed by the nearest `for`.
    Continue,
}

impl From<EvalError> for ControlAction {
    fn from(error: EvalError) -> Self {
        ControlAction::Error(Box::new(error))
    }
}

impl ControlAction {
    /// Turn a stray `return`/`break`/`continue` into an error.
    ///
    /// Used at boundaries that no control signal may cross (lazy dictionary
    /// fields, top-level `break`).
    pub fn into_error(self) -> Box<EvalError> {
        match self {
            ControlAction::Error(error) => error,
            ControlAction::Return(_) => Box::new(misplaced_control("return")),
            ControlAction::Break => Box::new(misplaced_control("break")),
            ControlAction::Continue => Box::new(misplaced_control("continue")),
        }
    }
}

/// Typed error category.
///
/// Each variant maps to one [`ErrorCode`]; the `Display` impl produces the
/// user-facing message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    UndefinedVariable {
        name: String,
    },
    TypeMismatch {
        expected: String,
        got: String,
    },
    InvalidBinaryOp {
        op: BinaryOp,
        left: String,
        right: String,
    },
    NoSuchProperty {
        name: String,
        type_name: String,
    },
    NoSuchMethod {
        name: String,
        type_name: String,
    },
    ArityMismatch {
        name: String,
        expected: String,
        got: usize,
    },
    DivisionByZero,
    ModuloByZero,
    IndexOutOfBounds {
        index: i64,
        len: usize,
    },
    IntegerOverflow {
        operation: &'static str,
    },
    StackOverflow {
        depth: usize,
    },
    PermissionDenied {
        path: PathBuf,
        operation: &'static str,
    },
    SelfReferentialField {
        key: String,
    },
    /// Raised by `fail(message)`.
    Failed {
        message: String,
    },
    NotCallable {
        type_name: String,
    },
    Io {
        path: String,
        message: String,
    },
    InvalidValue {
        message: String,
    },
    RangeTooLarge {
        len: u64,
        max: usize,
    },
    MisplacedControl {
        keyword: &'static str,
    },
    CircularImport {
        chain: Vec<PathBuf>,
    },
    ModuleNotFound {
        path: PathBuf,
    },
    ModuleParse {
        path: PathBuf,
        message: String,
        position: Position,
    },
}

impl EvalErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UndefinedVariable { .. } => ErrorCode::E6001,
            Self::TypeMismatch { .. }
            | Self::InvalidBinaryOp { .. }
            | Self::NoSuchProperty { .. }
            | Self::NoSuchMethod { .. } => ErrorCode::E6002,
            Self::ArityMismatch { .. } => ErrorCode::E6003,
            Self::DivisionByZero | Self::ModuloByZero => ErrorCode::E6004,
            Self::IndexOutOfBounds { .. } => ErrorCode::E6005,
            Self::IntegerOverflow { .. } => ErrorCode::E6006,
            Self::StackOverflow { .. } => ErrorCode::E6007,
            Self::PermissionDenied { .. } => ErrorCode::E6008,
            Self::SelfReferentialField { .. } => ErrorCode::E6009,
            Self::Failed { .. } => ErrorCode::E6010,
            Self::NotCallable { .. } => ErrorCode::E6011,
            Self::Io { .. } => ErrorCode::E6012,
            Self::InvalidValue { .. } | Self::RangeTooLarge { .. } => ErrorCode::E6013,
            Self::MisplacedControl { .. } => ErrorCode::E6014,
            Self::CircularImport { .. } => ErrorCode::E7001,
            Self::ModuleNotFound { .. } => ErrorCode::E7002,
            Self::ModuleParse { .. } => ErrorCode::E7003,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedVariable { name } => write!(f, "undefined variable: {name}"),
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::InvalidBinaryOp { op, left, right } => write!(
                f,
                "operator `{}` cannot be applied to {left} and {right}",
                op.as_symbol()
            ),
            Self::NoSuchProperty { name, type_name } => {
                write!(f, "{type_name} has no property `{name}`")
            }
            Self::NoSuchMethod { name, type_name } => {
                write!(f, "{type_name} has no method `{name}`")
            }
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => write!(f, "{name} expects {expected} argument(s), got {got}"),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::ModuloByZero => write!(f, "modulo by zero"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::IntegerOverflow { operation } => write!(f, "integer overflow in {operation}"),
            Self::StackOverflow { depth } => {
                write!(f, "maximum call depth of {depth} exceeded")
            }
            Self::PermissionDenied { path, operation } => {
                write!(f, "{operation} access denied: {}", path.display())
            }
            Self::SelfReferentialField { key } => {
                write!(f, "dictionary field `{key}` refers to itself")
            }
            Self::Failed { message } | Self::InvalidValue { message } => write!(f, "{message}"),
            Self::NotCallable { type_name } => write!(f, "{type_name} is not callable"),
            Self::Io { path, message } => write!(f, "{path}: {message}"),
            Self::RangeTooLarge { len, max } => {
                write!(f, "range of {len} elements exceeds the limit of {max}")
            }
            Self::MisplacedControl { keyword } => write!(f, "`{keyword}` outside of its construct"),
            Self::CircularImport { chain } => {
                let chain: Vec<String> = chain.iter().map(|p| p.display().to_string()).collect();
                write!(f, "circular import: {}", chain.join(" -> "))
            }
            Self::ModuleNotFound { path } => write!(f, "module not found: {}", path.display()),
            Self::ModuleParse { message, .. } => write!(f, "{message}"),
        }
    }
}

/// A runtime error with its location.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub message: String,
    pub span: Option<Span>,
    /// 1-based line/column of `span` in `module` (or the entry source).
    pub position: Option<Position>,
    /// Source file the error occurred in, when it came from a file.
    pub module: Option<PathBuf>,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            span: None,
            position: None,
            module: None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    /// Attach a location if the error does not have one yet.
    ///
    /// Errors are located at the innermost expression that produced them;
    /// outer expressions leave that location alone.
    #[must_use]
    pub fn located(mut self, span: Span, index: &LineIndex, module: Option<&Path>) -> Self {
        if self.span.is_none() && self.position.is_none() {
            self.span = Some(span);
            self.position = Some(index.span_start(span));
            self.module = module.map(Path::to_path_buf);
        }
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diagnostic = Diagnostic::new(self.code(), self.message.clone());
        if let Some(span) = self.span {
            diagnostic = diagnostic.with_label(span, self.kind.code().description());
        }
        match &self.kind {
            EvalErrorKind::ModuleParse { path, position, .. } => {
                diagnostic.with_note(format!("in {}:{position}", path.display()))
            }
            EvalErrorKind::CircularImport { chain } if chain.len() > 2 => {
                diagnostic.with_note(format!("the cycle passes through {} modules", chain.len() - 1))
            }
            EvalErrorKind::PermissionDenied { operation, .. } => {
                diagnostic.with_help(format!("the security policy must grant {operation} access to this path"))
            }
            EvalErrorKind::StackOverflow { .. } => diagnostic.with_help("check for recursion without a base case"),
            _ => diagnostic,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.module, self.position) {
            (Some(module), Some(pos)) => write!(f, "{}:{pos}: {}", module.display(), self.message),
            (None, Some(pos)) => write!(f, "{pos}: {}", self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for EvalError {}

// Factories

pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

pub fn type_mismatch(expected: &str, got: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.type_name().to_string(),
    })
}

pub fn invalid_binary_op(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidBinaryOp {
        op,
        left: left.type_name().to_string(),
        right: right.type_name().to_string(),
    })
}

pub fn no_such_property(name: &str, receiver: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoSuchProperty {
        name: name.to_string(),
        type_name: receiver.type_name().to_string(),
    })
}

pub fn no_such_method(name: &str, receiver: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoSuchMethod {
        name: name.to_string(),
        type_name: receiver.type_name().to_string(),
    })
}

pub fn arity_mismatch(name: &str, expected: impl Into<String>, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected: expected.into(),
        got,
    })
}

pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

pub fn modulo_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuloByZero)
}

pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

pub fn integer_overflow(operation: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow { operation })
}

pub fn stack_overflow(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth })
}

pub fn permission_denied(path: &Path, operation: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::PermissionDenied {
        path: path.to_path_buf(),
        operation,
    })
}

pub fn self_referential_field(key: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::SelfReferentialField {
        key: key.to_string(),
    })
}

pub fn failed(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Failed {
        message: message.into(),
    })
}

pub fn not_callable(value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: value.type_name().to_string(),
    })
}

pub fn io_error(path: impl Into<String>, message: impl fmt::Display) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Io {
        path: path.into(),
        message: message.to_string(),
    })
}

pub fn invalid_value(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidValue {
        message: message.into(),
    })
}

pub fn range_too_large(len: u64, max: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RangeTooLarge { len, max })
}

pub fn misplaced_control(keyword: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MisplacedControl { keyword })
}

pub fn circular_import(chain: Vec<PathBuf>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CircularImport { chain })
}

pub fn module_not_found(path: &Path) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuleNotFound {
        path: path.to_path_buf(),
    })
}

pub fn module_parse(path: &Path, message: &str, position: Position) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuleParse {
        path: path.to_path_buf(),
        message: message.to_string(),
        position,
    })
    .in_module(path, position)
}

impl EvalError {
    /// Locate an error in another file, where no span of the current unit applies.
    #[must_use]
    fn in_module(mut self, path: &Path, position: Position) -> Self {
        self.module = Some(path.to_path_buf());
        self.position = Some(position);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_codes() {
        assert_eq!(division_by_zero().code(), ErrorCode::E6004);
        assert_eq!(undefined_variable("x").code(), ErrorCode::E6001);
        assert_eq!(circular_import(vec![]).code(), ErrorCode::E7001);
        assert_eq!(misplaced_control("break").code(), ErrorCode::E6014);
    }

    #[test]
    fn messages() {
        assert_eq!(undefined_variable("foo").message, "undefined variable: foo");
        assert_eq!(
            invalid_binary_op(BinaryOp::Add, &Value::Int(1), &Value::Null).message,
            "operator `+` cannot be applied to integer and null"
        );
        assert_eq!(
            circular_import(vec![PathBuf::from("/a.quill"), PathBuf::from("/b.quill")]).message,
            "circular import: /a.quill -> /b.quill"
        );
    }

    #[test]
    fn located_keeps_innermost_span() {
        let index = LineIndex::new("let x = 1\nfoo");
        let error = undefined_variable("foo")
            .located(Span::new(10, 13), &index, None)
            .located(Span::new(0, 13), &index, None);
        assert_eq!(error.span, Some(Span::new(10, 13)));
        assert_eq!(error.position, Some(Position::new(2, 1)));
        assert_eq!(error.to_string(), "2:1: undefined variable: foo");
    }

    #[test]
    fn diagnostics_add_what_the_message_leaves_out() {
        let index = LineIndex::new("save ==> @out.json");
        let denied = permission_denied(Path::new("/srv/out.json"), "write").located(Span::new(0, 4), &index, None);
        let diagnostic = denied.to_diagnostic();
        assert_eq!(diagnostic.code, ErrorCode::E6008);
        assert_eq!(diagnostic.primary_span(), Some(Span::new(0, 4)));
        assert_eq!(
            diagnostic.help.as_deref(),
            Some("the security policy must grant write access to this path")
        );

        let parse = module_parse(Path::new("/m/lib.quill"), "expected expression", Position::new(3, 7));
        assert_eq!(parse.to_diagnostic().notes, vec!["in /m/lib.quill:3:7".to_string()]);

        assert!(division_by_zero().to_diagnostic().labels.is_empty());
    }

    #[test]
    fn stray_control_becomes_error() {
        let error = ControlAction::Break.into_error();
        assert_eq!(error.code(), ErrorCode::E6014);
    }
}
