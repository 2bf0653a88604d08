//! Global builtin functions.
//!
//! Builtins live in a static table and are bound into the global scope by
//! [`register`]. Each receives the interpreter, its evaluated arguments and
//! the call site; the interpreter checks arity before calling.

use std::sync::Arc;

use quill_ir::Span;

use crate::codecs::Format;
use crate::environment::Environment;
use crate::errors::{arity_mismatch, failed, invalid_value, type_mismatch, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::paths;
use crate::pseudo::{self, datetime, duration, file, path, regex, url, PseudoKind};
use crate::unit::Unit;
use crate::value::Value;

/// Where a builtin was called from.
pub struct CallSite<'a> {
    pub unit: &'a Arc<Unit>,
    pub span: Span,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Arity {
    Exact(usize),
    Between(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn check(self, name: &str, got: usize) -> Result<(), EvalError> {
        let ok = match self {
            Arity::Exact(n) => got == n,
            Arity::Between(min, max) => (min..=max).contains(&got),
            Arity::AtLeast(min) => got >= min,
        };
        if ok {
            return Ok(());
        }
        let expected = match self {
            Arity::Exact(n) => n.to_string(),
            Arity::Between(min, max) => format!("{min} to {max}"),
            Arity::AtLeast(min) => format!("at least {min}"),
        };
        Err(arity_mismatch(name, expected, got))
    }
}

pub type BuiltinFn = fn(&mut Interpreter, Vec<Value>, &CallSite<'_>) -> EvalResult;

pub struct Builtin {
    pub name: &'static str,
    pub arity: Arity,
    pub(crate) func: BuiltinFn,
}

impl Builtin {
    pub(crate) fn call(&self, interp: &mut Interpreter, args: Vec<Value>, site: &CallSite<'_>) -> EvalResult {
        self.arity.check(self.name, args.len())?;
        (self.func)(interp, args, site)
    }
}

const fn builtin(name: &'static str, arity: Arity, func: BuiltinFn) -> Builtin {
    Builtin { name, arity, func }
}

static BUILTINS: &[Builtin] = &[
    builtin("print", Arity::AtLeast(0), print),
    builtin("println", Arity::AtLeast(0), println),
    builtin("len", Arity::Exact(1), len),
    builtin("type", Arity::Exact(1), type_of),
    builtin("str", Arity::Exact(1), to_str),
    builtin("int", Arity::Exact(1), to_int),
    builtin("float", Arity::Exact(1), to_float),
    builtin("keys", Arity::Exact(1), keys),
    builtin("values", Arity::Exact(1), values),
    builtin("fail", Arity::Between(0, 1), fail),
    builtin("now", Arity::Exact(0), now),
    builtin("date", Arity::Exact(1), date),
    builtin("duration", Arity::Exact(1), make_duration),
    builtin("path", Arity::Exact(1), make_path),
    builtin("url", Arity::Exact(1), make_url),
    builtin("regex", Arity::Between(1, 2), make_regex),
    builtin("file", Arity::Between(1, 2), open_file),
    builtin("JSON", Arity::Exact(1), open_json),
    builtin("CSV", Arity::Exact(1), open_csv),
    builtin("lines", Arity::Exact(1), open_lines),
    builtin("text", Arity::Exact(1), open_text),
    builtin("bytes", Arity::Exact(1), open_bytes),
    builtin("import", Arity::Exact(1), import),
];

/// Bind every builtin in `env`.
pub fn register(env: &Environment) {
    for builtin in BUILTINS {
        env.define(builtin.name, Value::Builtin(builtin));
    }
}

pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|builtin| builtin.name)
}

fn joined(interp: &mut Interpreter, args: &[Value]) -> EvalResult<String> {
    let mut parts = Vec::with_capacity(args.len());
    for arg in args {
        parts.push(interp.rendered(arg)?);
    }
    Ok(parts.join(" "))
}

fn print(interp: &mut Interpreter, args: Vec<Value>, _: &CallSite<'_>) -> EvalResult {
    let text = joined(interp, &args)?;
    interp.print_handler().print(&text);
    Ok(Value::Null)
}

fn println(interp: &mut Interpreter, args: Vec<Value>, _: &CallSite<'_>) -> EvalResult {
    let text = joined(interp, &args)?;
    interp.print_handler().println(&text);
    Ok(Value::Null)
}

fn len(_: &mut Interpreter, args: Vec<Value>, _: &CallSite<'_>) -> EvalResult {
    let n = match &args[0] {
        Value::Str(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Dict(dict) => dict.read().len(),
        other => return Err(type_mismatch("string, array or dictionary", other).into()),
    };
    Ok(Value::Int(i64::try_from(n).unwrap_or(i64::MAX)))
}

fn type_of(_: &mut Interpreter, args: Vec<Value>, _: &CallSite<'_>) -> EvalResult {
    let name = pseudo::kind_of(&args[0]).map_or_else(|| args[0].type_name(), PseudoKind::as_str);
    Ok(Value::from(name))
}

fn to_str(interp: &mut Interpreter, args: Vec<Value>, _: &CallSite<'_>) -> EvalResult {
    Ok(Value::from(interp.rendered(&args[0])?))
}

#[expect(clippy::cast_possible_truncation, reason = "range is checked before the cast")]
#[expect(clippy::cast_precision_loss, reason = "bounds are approximate at the edges")]
fn to_int(_: &mut Interpreter, args: Vec<Value>, _: &CallSite<'_>) -> EvalResult {
    match &args[0] {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(Value::Int(f.trunc() as i64)),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Str(s) => s
            .trim()
            .replace('_', "")
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| invalid_value(format!("cannot convert \"{s}\" to integer")).into()),
        other => Err(invalid_value(format!("cannot convert {} to integer", other.type_name())).into()),
    }
}

fn to_float(_: &mut Interpreter, args: Vec<Value>, _: &CallSite<'_>) -> EvalResult {
    match &args[0] {
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| invalid_value(format!("cannot convert \"{s}\" to float")).into()),
        other => other
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| invalid_value(format!("cannot convert {} to float", other.type_name())).into()),
    }
}

fn keys(interp: &mut Interpreter, args: Vec<Value>, _: &CallSite<'_>) -> EvalResult {
    interp.dict_keys(&args[0])
}

fn values(interp: &mut Interpreter, args: Vec<Value>, _: &CallSite<'_>) -> EvalResult {
    interp.dict_values(&args[0])
}

fn fail(interp: &mut Interpreter, args: Vec<Value>, _: &CallSite<'_>) -> EvalResult {
    let message = match args.first() {
        Some(value) => interp.rendered(value)?,
        None => "failed".to_string(),
    };
    Err(failed(message).into())
}

fn now(_: &mut Interpreter, _: Vec<Value>, _: &CallSite<'_>) -> EvalResult {
    Ok(datetime::now())
}

fn text_arg<'a>(value: &'a Value, what: &str) -> Result<&'a str, EvalError> {
    value.as_str().ok_or_else(|| type_mismatch(what, value))
}

fn date(_: &mut Interpreter, args: Vec<Value>, _: &CallSite<'_>) -> EvalResult {
    match &args[0] {
        Value::Dict(dict) if pseudo::kind_of_dict(dict) == Some(PseudoKind::DateTime) => Ok(args[0].clone()),
        Value::Int(seconds) => datetime::from_unix(*seconds).map_err(Into::into),
        other => Ok(datetime::parse(text_arg(other, "string")?)?),
    }
}

fn make_duration(_: &mut Interpreter, args: Vec<Value>, _: &CallSite<'_>) -> EvalResult {
    match &args[0] {
        Value::Int(seconds) => Ok(duration::new(0, *seconds)),
        other => Ok(duration::parse(text_arg(other, "string")?)?),
    }
}

fn make_path(_: &mut Interpreter, args: Vec<Value>, _: &CallSite<'_>) -> EvalResult {
    Ok(path::new(&path_text(&args[0])?))
}

fn make_url(_: &mut Interpreter, args: Vec<Value>, _: &CallSite<'_>) -> EvalResult {
    Ok(url::parse(text_arg(&args[0], "string")?)?)
}

fn make_regex(_: &mut Interpreter, args: Vec<Value>, _: &CallSite<'_>) -> EvalResult {
    let pattern = text_arg(&args[0], "string")?;
    let flags = match args.get(1) {
        Some(flags) => text_arg(flags, "string")?,
        None => "",
    };
    Ok(regex::new(pattern, flags)?)
}

/// Path text of a string, path or file handle argument.
pub(crate) fn path_text(value: &Value) -> Result<String, EvalError> {
    match value {
        Value::Str(s) => Ok(s.to_string()),
        Value::Dict(dict) => match pseudo::kind_of_dict(dict) {
            Some(PseudoKind::Path) => Ok(path::text(dict)),
            Some(PseudoKind::File) => Ok(file::path(dict)),
            _ => Err(type_mismatch("path", value)),
        },
        other => Err(type_mismatch("path", other)),
    }
}

/// A file handle whose path is fixed relative to the calling file.
fn handle(value: &Value, format: Option<Format>, site: &CallSite<'_>) -> EvalResult {
    let text = path_text(value)?;
    let format = format.unwrap_or_else(|| Format::from_path(&text));
    if paths::is_stdio(&text) {
        return Ok(file::new(&text, format));
    }
    let resolved = paths::resolve(&text, &site.unit.base_dir());
    Ok(file::new(&resolved.to_string_lossy(), format))
}

fn open_file(_: &mut Interpreter, args: Vec<Value>, site: &CallSite<'_>) -> EvalResult {
    let format = match args.get(1) {
        Some(name) => {
            let name = text_arg(name, "string")?;
            Some(Format::from_name(name).ok_or_else(|| invalid_value(format!("unknown format `{name}`")))?)
        }
        None => None,
    };
    handle(&args[0], format, site)
}

fn open_json(_: &mut Interpreter, args: Vec<Value>, site: &CallSite<'_>) -> EvalResult {
    handle(&args[0], Some(Format::Json), site)
}

fn open_csv(_: &mut Interpreter, args: Vec<Value>, site: &CallSite<'_>) -> EvalResult {
    handle(&args[0], Some(Format::Csv), site)
}

fn open_lines(_: &mut Interpreter, args: Vec<Value>, site: &CallSite<'_>) -> EvalResult {
    handle(&args[0], Some(Format::Lines), site)
}

fn open_text(_: &mut Interpreter, args: Vec<Value>, site: &CallSite<'_>) -> EvalResult {
    handle(&args[0], Some(Format::Text), site)
}

fn open_bytes(_: &mut Interpreter, args: Vec<Value>, site: &CallSite<'_>) -> EvalResult {
    handle(&args[0], Some(Format::Bytes), site)
}

fn import(interp: &mut Interpreter, args: Vec<Value>, site: &CallSite<'_>) -> EvalResult {
    interp.import(&args[0], site.unit)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn arity_messages() {
        assert!(Arity::Exact(1).check("len", 1).is_ok());
        assert_eq!(
            Arity::Exact(1).check("len", 2).map_err(|e| e.message),
            Err("len expects 1 argument(s), got 2".to_string())
        );
        assert_eq!(
            Arity::Between(1, 2).check("regex", 0).map_err(|e| e.message),
            Err("regex expects 1 to 2 argument(s), got 0".to_string())
        );
        assert!(Arity::AtLeast(0).check("print", 5).is_ok());
    }

    #[test]
    fn table_has_unique_names() {
        let mut names: Vec<&str> = names().collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert!(names.contains(&"import"));
    }
}
