//! Methods on builtin receiver types.
//!
//! `receiver.name(args)` is tried here before dictionary lookup. Returning
//! `None` means the receiver type has no such method, and the call falls
//! through to calling the `name` field.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::builtins::{Arity, CallSite};
use crate::errors::{integer_overflow, invalid_value, type_mismatch, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::operators;
use crate::pseudo::{self, regex, PseudoKind};
use crate::value::{render, Dict, Value};

pub(crate) fn dispatch(
    interp: &mut Interpreter,
    receiver: &Value,
    name: &str,
    args: Vec<Value>,
    site: &CallSite<'_>,
) -> Option<EvalResult> {
    match receiver {
        Value::Str(s) => string_method(s, name, &args).map(|r| r.map_err(Into::into)),
        Value::Array(items) => array_method(interp, items, name, args, site),
        Value::Dict(dict) => dict_method(interp, dict, name, &args),
        Value::Int(_) | Value::Float(_) => number_method(receiver, name, &args).map(|r| r.map_err(Into::into)),
        _ => None,
    }
}

fn arity(name: &str, args: &[Value], arity: Arity) -> Result<(), EvalError> {
    arity.check(name, args.len())
}

fn len_value(n: usize) -> Value {
    Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
}

fn regex_arg(value: &Value) -> Option<Result<::regex::Regex, EvalError>> {
    match value {
        Value::Dict(dict) if pseudo::kind_of_dict(dict) == Some(PseudoKind::Regex) => Some(regex::compile_dict(dict)),
        _ => None,
    }
}

fn string_method(s: &str, name: &str, args: &[Value]) -> Option<Result<Value, EvalError>> {
    let result = match name {
        "length" => arity(name, args, Arity::Exact(0)).map(|()| len_value(s.chars().count())),
        "upper" => arity(name, args, Arity::Exact(0)).map(|()| Value::from(s.to_uppercase())),
        "lower" => arity(name, args, Arity::Exact(0)).map(|()| Value::from(s.to_lowercase())),
        "trim" => arity(name, args, Arity::Exact(0)).map(|()| Value::from(s.trim())),
        "split" => arity(name, args, Arity::Between(0, 1)).and_then(|()| split(s, args.first())),
        "replace" => arity(name, args, Arity::Exact(2)).and_then(|()| replace(s, &args[0], &args[1])),
        "contains" => arity(name, args, Arity::Exact(1)).and_then(|()| match regex_arg(&args[0]) {
            Some(re) => re.map(|re| Value::Bool(re.is_match(s))),
            None => Ok(Value::Bool(s.contains(&*render(&args[0])))),
        }),
        "startsWith" => arity(name, args, Arity::Exact(1)).map(|()| Value::Bool(s.starts_with(&*render(&args[0])))),
        "endsWith" => arity(name, args, Arity::Exact(1)).map(|()| Value::Bool(s.ends_with(&*render(&args[0])))),
        _ => return None,
    };
    Some(result)
}

fn split(s: &str, separator: Option<&Value>) -> Result<Value, EvalError> {
    let parts: Vec<Value> = match separator {
        None => s.split_whitespace().map(Value::from).collect(),
        Some(Value::Str(sep)) if sep.is_empty() => s.chars().map(|c| Value::from(c.to_string())).collect(),
        Some(Value::Str(sep)) => s.split(&**sep).map(Value::from).collect(),
        Some(other) => match regex_arg(other) {
            Some(re) => re?.split(s).map(Value::from).collect(),
            None => return Err(type_mismatch("string or regex", other)),
        },
    };
    Ok(Value::array(parts))
}

fn replace(s: &str, from: &Value, to: &Value) -> Result<Value, EvalError> {
    let to = render(to);
    match regex_arg(from) {
        Some(re) => Ok(Value::from(re?.replace_all(s, to.as_str()).into_owned())),
        None => match from {
            Value::Str(from) => Ok(Value::from(s.replace(&**from, &to))),
            other => Err(type_mismatch("string or regex", other)),
        },
    }
}

fn array_method(
    interp: &mut Interpreter,
    items: &Arc<Vec<Value>>,
    name: &str,
    args: Vec<Value>,
    site: &CallSite<'_>,
) -> Option<EvalResult> {
    let result = match name {
        "length" => arity(name, &args, Arity::Exact(0))
            .map(|()| len_value(items.len()))
            .map_err(Into::into),
        "map" => map(interp, items, args, site),
        "filter" => filter(interp, items, args, site),
        "reduce" => reduce(interp, items, args, site),
        "join" => join(interp, items, &args),
        "sort" => sort(interp, items, &args),
        "reverse" => arity(name, &args, Arity::Exact(0))
            .map(|()| Value::array(items.iter().rev().cloned().collect()))
            .map_err(Into::into),
        "contains" => arity(name, &args, Arity::Exact(1))
            .map(|()| Value::Bool(items.iter().any(|item| item.equals(&args[0]))))
            .map_err(Into::into),
        "first" => arity(name, &args, Arity::Exact(0))
            .map(|()| items.first().cloned().unwrap_or(Value::Null))
            .map_err(Into::into),
        "last" => arity(name, &args, Arity::Exact(0))
            .map(|()| items.last().cloned().unwrap_or(Value::Null))
            .map_err(Into::into),
        _ => return None,
    };
    Some(result)
}

fn map(interp: &mut Interpreter, items: &[Value], args: Vec<Value>, site: &CallSite<'_>) -> EvalResult {
    arity("map", &args, Arity::Exact(1))?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(interp.call_value(&args[0], vec![item.clone()], site)?);
    }
    Ok(Value::array(out))
}

fn filter(interp: &mut Interpreter, items: &[Value], args: Vec<Value>, site: &CallSite<'_>) -> EvalResult {
    arity("filter", &args, Arity::Exact(1))?;
    let mut out = Vec::new();
    for item in items {
        if interp.call_value(&args[0], vec![item.clone()], site)?.is_truthy() {
            out.push(item.clone());
        }
    }
    Ok(Value::array(out))
}

fn reduce(interp: &mut Interpreter, items: &[Value], args: Vec<Value>, site: &CallSite<'_>) -> EvalResult {
    arity("reduce", &args, Arity::Between(1, 2))?;
    let mut rest = items.iter();
    let mut acc = match args.get(1) {
        Some(init) => init.clone(),
        None => match rest.next() {
            Some(first) => first.clone(),
            None => return Ok(Value::Null),
        },
    };
    for item in rest {
        acc = interp.call_value(&args[0], vec![acc, item.clone()], site)?;
    }
    Ok(acc)
}

fn join(interp: &mut Interpreter, items: &[Value], args: &[Value]) -> EvalResult {
    arity("join", args, Arity::Between(0, 1))?;
    let separator = args.first().map(render).unwrap_or_default();
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        parts.push(interp.rendered(item)?);
    }
    Ok(Value::from(parts.join(&separator)))
}

fn sort(interp: &mut Interpreter, items: &[Value], args: &[Value]) -> EvalResult {
    arity("sort", args, Arity::Exact(0))?;
    let mut sorted = items.to_vec();
    for item in &sorted {
        interp.resolve(item)?;
    }
    sorted.sort_by(value_cmp);
    Ok(Value::array(sorted))
}

/// Ordering used by `sort`: numbers numerically, strings naturally,
/// anything else by natural order of the rendered text.
pub fn value_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => natural_cmp(x, y),
        _ => operators::compare(a, b).unwrap_or_else(|| natural_cmp(&render(a), &render(b))),
    }
}

/// Compare strings with runs of digits compared as numbers, so `z2`
/// sorts before `z11`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();
    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let x = take_digits(&mut a);
                let y = take_digits(&mut b);
                let (tx, ty) = (x.trim_start_matches('0'), y.trim_start_matches('0'));
                let ordering = tx
                    .len()
                    .cmp(&ty.len())
                    .then_with(|| tx.cmp(ty))
                    .then_with(|| x.len().cmp(&y.len()));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        digits.push(c);
    }
    digits
}

fn dict_method(interp: &mut Interpreter, dict: &Dict, name: &str, args: &[Value]) -> Option<EvalResult> {
    let receiver = Value::Dict(dict.clone());
    let result = match name {
        "keys" => arity(name, args, Arity::Exact(0))
            .map_err(Into::into)
            .and_then(|()| interp.dict_keys(&receiver)),
        "values" => arity(name, args, Arity::Exact(0))
            .map_err(Into::into)
            .and_then(|()| interp.dict_values(&receiver)),
        "has" => arity(name, args, Arity::Exact(1))
            .map(|()| Value::Bool(dict.read().contains_key(&render(&args[0]))))
            .map_err(Into::into),
        "delete" => arity(name, args, Arity::Exact(1))
            .map(|()| {
                dict.write().remove(&render(&args[0]));
                receiver.clone()
            })
            .map_err(Into::into),
        _ => return None,
    };
    Some(result)
}

#[expect(clippy::cast_possible_truncation, reason = "range is checked before the cast")]
#[expect(clippy::cast_precision_loss, reason = "bounds are approximate at the edges")]
fn float_to_int(f: f64) -> Result<i64, EvalError> {
    if f.is_finite() && f.abs() < i64::MAX as f64 {
        Ok(f as i64)
    } else {
        Err(invalid_value(format!("{f} does not fit in an integer")))
    }
}

fn number_method(receiver: &Value, name: &str, args: &[Value]) -> Option<Result<Value, EvalError>> {
    let result = match (receiver, name) {
        (Value::Int(n), "round" | "floor" | "ceil") => arity(name, args, Arity::Between(0, 1)).map(|()| Value::Int(*n)),
        (Value::Int(n), "abs") => arity(name, args, Arity::Exact(0))
            .and_then(|()| n.checked_abs().map(Value::Int).ok_or_else(|| integer_overflow("abs"))),
        (Value::Float(f), "round") => arity(name, args, Arity::Between(0, 1)).and_then(|()| match args.first() {
            None => float_to_int(f.round()).map(Value::Int),
            Some(Value::Int(digits)) => {
                let scale = 10f64.powi(i32::try_from(*digits).unwrap_or(0));
                Ok(Value::Float((f * scale).round() / scale))
            }
            Some(other) => Err(type_mismatch("integer", other)),
        }),
        (Value::Float(f), "floor") => arity(name, args, Arity::Exact(0)).and_then(|()| float_to_int(f.floor()).map(Value::Int)),
        (Value::Float(f), "ceil") => arity(name, args, Arity::Exact(0)).and_then(|()| float_to_int(f.ceil()).map(Value::Int)),
        (Value::Float(f), "abs") => arity(name, args, Arity::Exact(0)).map(|()| Value::Float(f.abs())),
        _ => return None,
    };
    Some(result)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sorted(words: &[&str]) -> Vec<String> {
        let mut values: Vec<Value> = words.iter().copied().map(Value::from).collect();
        values.sort_by(value_cmp);
        values.iter().map(render).collect()
    }

    #[test]
    fn natural_order() {
        assert_eq!(sorted(&["z11", "z1", "z2"]), vec!["z1", "z2", "z11"]);
        assert_eq!(sorted(&["file10.txt", "file9.txt", "file009.txt"]), vec![
            "file9.txt",
            "file009.txt",
            "file10.txt"
        ]);
        assert_eq!(natural_cmp("abc", "abd"), Ordering::Less);
        assert_eq!(natural_cmp("a", "a1"), Ordering::Less);
    }

    #[test]
    fn mixed_values_sort_numbers_first_by_text() {
        let mut values = vec![Value::Int(10), Value::Float(2.5), Value::Int(3)];
        values.sort_by(value_cmp);
        assert_eq!(values.iter().map(render).collect::<Vec<_>>(), vec!["2.5", "3", "10"]);
    }

    #[test]
    fn string_methods() {
        let call = |name: &str, args: &[Value]| string_method("Hello World", name, args).map(|r| r.map(|v| render(&v)));
        assert_eq!(call("upper", &[]), Some(Ok("HELLO WORLD".to_string())));
        assert_eq!(call("length", &[]), Some(Ok("11".to_string())));
        assert_eq!(call("contains", &[Value::from("lo W")]), Some(Ok("true".to_string())));
        assert_eq!(call("startsWith", &[Value::from("He")]), Some(Ok("true".to_string())));
        assert_eq!(call("replace", &[Value::from("o"), Value::from("0")]), Some(Ok("Hell0 W0rld".to_string())));
        assert_eq!(call("nope", &[]), None);
        assert!(matches!(call("upper", &[Value::Int(1)]), Some(Err(_))));
    }

    #[test]
    fn split_forms() {
        let words = split("a b  c", None).map(|v| format!("{v:?}"));
        assert_eq!(words, Ok(r#"[Str("a"), Str("b"), Str("c")]"#.to_string()));
        let parts = split("a,b", Some(&Value::from(","))).map(|v| format!("{v:?}"));
        assert_eq!(parts, Ok(r#"[Str("a"), Str("b")]"#.to_string()));
        let chars = split("ab", Some(&Value::from(""))).map(|v| format!("{v:?}"));
        assert_eq!(chars, Ok(r#"[Str("a"), Str("b")]"#.to_string()));
    }

    #[test]
    fn number_methods() {
        let call = |value: Value, name: &str| number_method(&value, name, &[]).map(|r| r.map(|v| format!("{v:?}")));
        assert_eq!(call(Value::Float(2.5), "round"), Some(Ok("Int(3)".to_string())));
        assert_eq!(call(Value::Float(-2.5), "floor"), Some(Ok("Int(-3)".to_string())));
        assert_eq!(call(Value::Float(2.1), "ceil"), Some(Ok("Int(3)".to_string())));
        assert_eq!(call(Value::Int(-4), "abs"), Some(Ok("Int(4)".to_string())));
        assert!(matches!(call(Value::Int(i64::MIN), "abs"), Some(Err(_))));
        assert_eq!(call(Value::Int(1), "length"), None);
    }
}
