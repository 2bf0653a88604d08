//! Runtime values.
//!
//! [`Value`] is a closed union. Strings and arrays are immutable `Arc`s
//! (arrays copy on write, so `a[0] = x` never changes another alias).
//! Dictionaries are shared and interior-mutable: every alias sees lazy
//! fields being forced and in-place assignment.
//!
//! Date/time, duration, path, URL, regex and file handle values are
//! dictionaries tagged with a `__type` key; see [`crate::pseudo`].

mod dict;
mod render;

use std::fmt;
use std::sync::Arc;

use quill_ir::ExprId;

use crate::builtins::Builtin;
use crate::environment::Environment;
use crate::errors::EvalError;
use crate::unit::Unit;

pub use dict::{Dict, DictData, Slot, Thunk};
pub use render::{render, render_float};

#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    Array(Arc<Vec<Value>>),
    Dict(Dict),
    Function(Arc<FunctionValue>),
    Builtin(&'static Builtin),
    /// A captured runtime error, produced by `{data, error} <== ...`.
    Error(Arc<EvalError>),
}

/// A closure: a function literal plus the environment it was created in.
pub struct FunctionValue {
    /// Name of the binding the function was first assigned to, for traces.
    pub name: Option<String>,
    pub unit: Arc<Unit>,
    /// The `ExprKind::Function` node.
    pub expr: ExprId,
    pub env: Environment,
}

impl Value {
    #[inline]
    pub fn string(s: impl Into<Arc<str>>) -> Value {
        Value::Str(s.into())
    }

    #[inline]
    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Arc::new(items))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Dict(_) => "dictionary",
            Value::Function(_) => "function",
            Value::Builtin(_) => "builtin",
            Value::Error(_) => "error",
        }
    }

    /// `null`, `false`, `0`, `0.0`, `""`, `[]` and `{}` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Dict(dict) => !dict.read().is_empty(),
            Value::Function(_) | Value::Builtin(_) | Value::Error(_) => true,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value of an integer or float.
    #[expect(clippy::cast_precision_loss, reason = "mixed arithmetic is float arithmetic")]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Structural equality. Integers and floats compare numerically;
    /// dictionaries compare their evaluated fields regardless of order.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                self.as_f64() == other.as_f64()
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                Arc::ptr_eq(a, b) || (a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y)))
            }
            (Value::Dict(a), Value::Dict(b)) => a.ptr_eq(b) || a.read().equals(&b.read()),
            (Value::Function(a), Value::Function(b)) => Arc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            (Value::Error(a), Value::Error(b)) => a.message == b.message,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl From<Dict> for Value {
    fn from(dict: Dict) -> Self {
        Value::Dict(dict)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Dict(dict) => write!(f, "{dict:?}"),
            Value::Function(func) => {
                write!(f, "Function({})", func.name.as_deref().unwrap_or("<anonymous>"))
            }
            Value::Builtin(builtin) => write!(f, "Builtin({})", builtin.name),
            Value::Error(error) => write!(f, "Error({:?})", error.message),
        }
    }
}

/// Renders like string interpolation does.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}
