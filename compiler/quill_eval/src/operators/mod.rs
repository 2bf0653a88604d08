//! Binary and unary operators.
//!
//! Dispatch is a match on the operator and both operand shapes. The
//! short-circuiting forms (`and`, `or`, `??`, and `&&`/`||` with a boolean
//! left operand) are handled by the interpreter before reaching here.
//! Operands must already be forced: set operations and equality look at
//! evaluated dictionary fields only.

use std::cmp::Ordering;
use std::sync::Arc;

use quill_ir::{BinaryOp, UnaryOp};
use rustc_hash::FxHashSet;

use crate::errors::{
    division_by_zero, integer_overflow, invalid_binary_op, invalid_value, modulo_by_zero, range_too_large,
    type_mismatch, EvalError,
};
use crate::pseudo::{self, datetime, duration, path, regex, url, PseudoKind};
use crate::value::{render, Dict, DictData, Value};

type OpResult = Result<Value, EvalError>;

/// Evaluate a non-short-circuit binary operator.
pub fn binary(op: BinaryOp, left: &Value, right: &Value, max_range: usize) -> OpResult {
    if let Some(result) = pseudo_binary(op, left, right)? {
        return Ok(result);
    }
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => subtract(left, right),
        BinaryOp::Mul => multiply(left, right, max_range),
        BinaryOp::Div => divide(left, right),
        BinaryOp::Mod => modulo(left, right),
        BinaryOp::Concat => Ok(concat(left, right)),
        BinaryOp::Eq => Ok(Value::Bool(left.equals(right))),
        BinaryOp::NotEq => Ok(Value::Bool(!left.equals(right))),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            let ordering = compare(left, right).ok_or_else(|| invalid_binary_op(op, left, right))?;
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::LtEq => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        BinaryOp::In => contains(right, left).map(Value::Bool),
        BinaryOp::Union => set_union(left, right),
        BinaryOp::Intersect => set_intersect(left, right),
        BinaryOp::Match => regex_match(left, right),
        BinaryOp::NotMatch => regex_match(left, right).map(|m| Value::Bool(m.is_null())),
        BinaryOp::Range => range(left, right, max_range),
        BinaryOp::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
        BinaryOp::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
        BinaryOp::Coalesce => Ok(if left.is_null() { right.clone() } else { left.clone() }),
    }
}

pub fn unary(op: UnaryOp, operand: &Value) -> OpResult {
    match (op, operand) {
        (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("negation")),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Neg, Value::Dict(dict)) if pseudo::kind_of_dict(dict) == Some(PseudoKind::Duration) => {
            duration::negate(dict)
        }
        (UnaryOp::Neg, other) => Err(type_mismatch("number", other)),
    }
}

/// Ordering used by `<`, `>` and friends.
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            left.as_f64()?.partial_cmp(&right.as_f64()?)
        }
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::Dict(a), Value::Dict(b)) => match (pseudo::kind_of_dict(a)?, pseudo::kind_of_dict(b)?) {
            (PseudoKind::DateTime, PseudoKind::DateTime) => {
                Some(datetime::instant(a).cmp(&datetime::instant(b)))
            }
            (PseudoKind::Duration, PseudoKind::Duration) => {
                Some(duration::approx_seconds(a).cmp(&duration::approx_seconds(b)))
            }
            _ => None,
        },
        _ => None,
    }
}

fn pseudo_binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Option<Value>, EvalError> {
    let (lk, rk) = (pseudo::kind_of(left), pseudo::kind_of(right));
    if lk.is_none() && rk.is_none() {
        return Ok(None);
    }
    let (Value::Dict(l), r) = (left, right) else {
        return Ok(None);
    };
    let result = match (op, lk, rk, r) {
        (BinaryOp::Add | BinaryOp::Sub, Some(PseudoKind::DateTime), Some(PseudoKind::Duration), Value::Dict(r)) => {
            datetime::shift(l, r, op == BinaryOp::Sub)?
        }
        (BinaryOp::Sub, Some(PseudoKind::DateTime), Some(PseudoKind::DateTime), Value::Dict(r)) => {
            datetime::difference(l, r)?
        }
        (BinaryOp::Add | BinaryOp::Sub, Some(PseudoKind::Duration), Some(PseudoKind::Duration), Value::Dict(r)) => {
            duration::combine(l, r, op == BinaryOp::Sub)?
        }
        (BinaryOp::Mul, Some(PseudoKind::Duration), None, Value::Int(n)) => duration::scale(l, *n)?,
        (BinaryOp::Add | BinaryOp::Div, Some(PseudoKind::Path), _, segment) => {
            let segment = match segment {
                Value::Str(s) => s.to_string(),
                Value::Dict(d) if rk == Some(PseudoKind::Path) => path::text(d),
                _ => return Ok(None),
            };
            path::new(&path::join(&path::text(l), &segment))
        }
        (BinaryOp::Add, Some(PseudoKind::Url), None, Value::Str(segment)) => url::extend(l, segment),
        _ => return Ok(None),
    };
    Ok(Some(result))
}

fn add(left: &Value, right: &Value) -> OpResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a
            .checked_add(*b)
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("addition")),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            float_op(left, right, |a, b| a + b)
        }
        (Value::Str(a), Value::Str(b)) => Ok(Value::from(format!("{a}{b}"))),
        (Value::Str(a), Value::Int(_) | Value::Float(_) | Value::Bool(_)) => {
            Ok(Value::from(format!("{a}{}", render(right))))
        }
        (Value::Int(_) | Value::Float(_) | Value::Bool(_), Value::Str(b)) => {
            Ok(Value::from(format!("{}{b}", render(left))))
        }
        _ => Err(invalid_binary_op(BinaryOp::Add, left, right)),
    }
}

fn subtract(left: &Value, right: &Value) -> OpResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a
            .checked_sub(*b)
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("subtraction")),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            float_op(left, right, |a, b| a - b)
        }
        (Value::Array(a), Value::Array(b)) => {
            let remove: FxHashSet<String> = b.iter().map(render).collect();
            Ok(dedupe(a.iter().filter(|item| !remove.contains(&render(item)))))
        }
        (Value::Dict(a), Value::Dict(b)) => {
            let mut data = a.read().clone();
            for key in b.read().keys() {
                data.remove(key);
            }
            Ok(Value::Dict(Dict::from_data(data)))
        }
        _ => Err(invalid_binary_op(BinaryOp::Sub, left, right)),
    }
}

fn multiply(left: &Value, right: &Value, max: usize) -> OpResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a
            .checked_mul(*b)
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("multiplication")),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            float_op(left, right, |a, b| a * b)
        }
        (Value::Str(s), Value::Int(n)) => {
            let n = repeat_count(*n, s.len(), max)?;
            Ok(Value::from(s.repeat(n)))
        }
        (Value::Array(items), Value::Int(n)) => {
            let n = repeat_count(*n, items.len(), max)?;
            let mut out = Vec::with_capacity(items.len() * n);
            for _ in 0..n {
                out.extend(items.iter().cloned());
            }
            Ok(Value::array(out))
        }
        _ => Err(invalid_binary_op(BinaryOp::Mul, left, right)),
    }
}

/// Repetition count for `unit_len * n`; the result is held to the same
/// length limit as a range. Negative counts repeat zero times.
fn repeat_count(n: i64, unit_len: usize, max: usize) -> Result<usize, EvalError> {
    let n = usize::try_from(n.max(0)).map_err(|_| integer_overflow("repetition"))?;
    let total = unit_len
        .checked_mul(n)
        .ok_or_else(|| integer_overflow("repetition"))?;
    if total > max {
        return Err(range_too_large(u64::try_from(total).unwrap_or(u64::MAX), max));
    }
    Ok(n)
}

fn divide(left: &Value, right: &Value) -> OpResult {
    match (left, right) {
        (_, Value::Int(0)) if matches!(left, Value::Int(_)) => Err(division_by_zero()),
        (Value::Int(a), Value::Int(b)) => a
            .checked_div(*b)
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("division")),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            if right.as_f64() == Some(0.0) {
                return Err(division_by_zero());
            }
            float_op(left, right, |a, b| a / b)
        }
        (Value::Array(items), Value::Int(n)) => {
            let size = match usize::try_from(*n) {
                Ok(0) => return Err(division_by_zero()),
                Ok(size) => size,
                Err(_) => return Err(invalid_value(format!("chunk size must be positive, got {n}"))),
            };
            Ok(Value::array(
                items.chunks(size).map(|chunk| Value::array(chunk.to_vec())).collect(),
            ))
        }
        _ => Err(invalid_binary_op(BinaryOp::Div, left, right)),
    }
}

fn modulo(left: &Value, right: &Value) -> OpResult {
    match (left, right) {
        (Value::Int(_), Value::Int(0)) => Err(modulo_by_zero()),
        (Value::Int(a), Value::Int(b)) => a
            .checked_rem(*b)
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("modulo")),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            if right.as_f64() == Some(0.0) {
                return Err(modulo_by_zero());
            }
            float_op(left, right, |a, b| a % b)
        }
        _ => Err(invalid_binary_op(BinaryOp::Mod, left, right)),
    }
}

fn float_op(left: &Value, right: &Value, f: impl Fn(f64, f64) -> f64) -> OpResult {
    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => Ok(Value::Float(f(a, b))),
        _ => Err(type_mismatch("number", if left.as_f64().is_none() { left } else { right })),
    }
}

/// `++`: join arrays, merge dictionaries, join strings. A scalar next to
/// an array is lifted into a one-element array.
pub fn concat(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Value::from(format!("{a}{b}")),
        (Value::Dict(a), Value::Dict(b)) => {
            let mut data = a.read().clone();
            for (key, slot) in b.read().iter() {
                data.insert(Arc::clone(key), slot.clone());
            }
            Value::Dict(Dict::from_data(data))
        }
        _ => {
            let mut items = lift(left);
            items.extend(lift(right));
            Value::array(items)
        }
    }
}

fn lift(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.as_ref().clone(),
        other => vec![other.clone()],
    }
}

/// Order-preserving, deduplicated by rendered value.
fn dedupe<'a>(items: impl Iterator<Item = &'a Value>) -> Value {
    let mut seen = FxHashSet::default();
    Value::array(items.filter(|item| seen.insert(render(item))).cloned().collect())
}

fn set_union(left: &Value, right: &Value) -> OpResult {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(*a || *b)),
        (Value::Array(a), Value::Array(b)) => Ok(dedupe(a.iter().chain(b.iter()))),
        (Value::Dict(a), Value::Dict(b)) => {
            let mut data: DictData = a.read().clone();
            for (key, slot) in b.read().iter() {
                if !data.contains_key(key) {
                    data.insert(Arc::clone(key), slot.clone());
                }
            }
            Ok(Value::Dict(Dict::from_data(data)))
        }
        _ => Err(invalid_binary_op(BinaryOp::Union, left, right)),
    }
}

fn set_intersect(left: &Value, right: &Value) -> OpResult {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(*a && *b)),
        (Value::Array(a), Value::Array(b)) => {
            let keep: FxHashSet<String> = b.iter().map(render).collect();
            Ok(dedupe(a.iter().filter(|item| keep.contains(&render(item)))))
        }
        (Value::Dict(a), Value::Dict(b)) => {
            let right = b.read();
            let mut data = DictData::new();
            for (key, slot) in a.read().iter() {
                if right.contains_key(key) {
                    data.insert(Arc::clone(key), slot.clone());
                }
            }
            Ok(Value::Dict(Dict::from_data(data)))
        }
        _ => Err(invalid_binary_op(BinaryOp::Intersect, left, right)),
    }
}

/// `needle in haystack`.
fn contains(haystack: &Value, needle: &Value) -> Result<bool, EvalError> {
    match haystack {
        Value::Array(items) => Ok(items.iter().any(|item| item.equals(needle))),
        Value::Dict(dict) => Ok(dict.read().contains_key(&render(needle))),
        Value::Str(s) => match needle {
            Value::Str(sub) => Ok(s.contains(sub.as_ref())),
            other => Err(type_mismatch("string", other)),
        },
        Value::Null => Ok(false),
        other => Err(invalid_binary_op(BinaryOp::In, needle, other)),
    }
}

/// `text ~ regex`: captures or `null`.
fn regex_match(left: &Value, right: &Value) -> OpResult {
    let Value::Str(text) = left else {
        return Err(invalid_binary_op(BinaryOp::Match, left, right));
    };
    let re = match right {
        Value::Dict(dict) if pseudo::kind_of_dict(dict) == Some(PseudoKind::Regex) => {
            regex::compile_dict(dict)?
        }
        Value::Str(pattern) => regex::compile(pattern, "")?,
        other => return Err(type_mismatch("regex", other)),
    };
    Ok(regex::captures(&re, text))
}

/// `a..b`, inclusive, descending when `a > b`.
fn range(left: &Value, right: &Value, max: usize) -> OpResult {
    let (Value::Int(start), Value::Int(end)) = (left, right) else {
        return Err(invalid_binary_op(BinaryOp::Range, left, right));
    };
    let (start, end) = (*start, *end);
    let len = start.abs_diff(end).saturating_add(1);
    if usize::try_from(len).map_or(true, |len| len > max) {
        return Err(range_too_large(len, max));
    }
    let items: Vec<Value> = if start <= end {
        (start..=end).map(Value::Int).collect()
    } else {
        (end..=start).rev().map(Value::Int).collect()
    };
    Ok(Value::array(items))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
