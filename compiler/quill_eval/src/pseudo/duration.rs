//! Durations: `@1y2mo3w4d5h6m7s`.
//!
//! Stored as calendar `months` plus exact `seconds`, since a month has no
//! fixed length. Years count as twelve months, weeks as seven days.

use std::fmt::Write;

use super::{int_field, tagged, PseudoKind};
use crate::errors::{integer_overflow, invalid_value, EvalError};
use crate::value::{Dict, Value};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

pub fn new(months: i64, seconds: i64) -> Value {
    tagged(
        PseudoKind::Duration,
        vec![("months", Value::Int(months)), ("seconds", Value::Int(seconds))],
    )
}

/// `(months, seconds)` of a duration dictionary.
pub fn parts(dict: &Dict) -> (i64, i64) {
    (int_field(dict, "months"), int_field(dict, "seconds"))
}

pub fn parse(text: &str) -> Result<Value, EvalError> {
    let invalid = || invalid_value(format!("invalid duration `{text}`"));
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let mut months: i64 = 0;
    let mut seconds: i64 = 0;
    let mut rest = body;
    if rest.is_empty() {
        return Err(invalid());
    }
    while !rest.is_empty() {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Err(invalid());
        }
        let amount: i64 = rest[..digits].parse().map_err(|_| invalid())?;
        rest = &rest[digits..];
        let (unit_months, unit_seconds, len) = if rest.starts_with("mo") {
            (1, 0, 2)
        } else {
            match rest.as_bytes().first() {
                Some(b'y') => (12, 0, 1),
                Some(b'w') => (0, WEEK, 1),
                Some(b'd') => (0, DAY, 1),
                Some(b'h') => (0, HOUR, 1),
                Some(b'm') => (0, MINUTE, 1),
                Some(b's') => (0, 1, 1),
                _ => return Err(invalid()),
            }
        };
        rest = &rest[len..];
        months = amount
            .checked_mul(unit_months)
            .and_then(|m| months.checked_add(m))
            .ok_or_else(|| integer_overflow("duration"))?;
        seconds = amount
            .checked_mul(unit_seconds)
            .and_then(|s| seconds.checked_add(s))
            .ok_or_else(|| integer_overflow("duration"))?;
    }
    if negative {
        months = -months;
        seconds = -seconds;
    }
    Ok(new(months, seconds))
}

/// Compact canonical form, e.g. `1y2mo25d5h6m7s`, `-90m` as `-1h30m`.
pub fn render(dict: &Dict) -> String {
    let (months, seconds) = parts(dict);
    if months == 0 && seconds == 0 {
        return "0s".to_string();
    }
    let negative = months < 0 || (months == 0 && seconds < 0);
    let (months, mut seconds) = if negative {
        (-months, -seconds)
    } else {
        (months, seconds)
    };
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    let years = months / 12;
    if years != 0 {
        let _ = write!(out, "{years}y");
    }
    if months % 12 != 0 {
        let _ = write!(out, "{}mo", months % 12);
    }
    for (unit, size) in [("d", DAY), ("h", HOUR), ("m", MINUTE), ("s", 1)] {
        let amount = seconds / size;
        if amount != 0 {
            let _ = write!(out, "{amount}{unit}");
        }
        seconds %= size;
    }
    out
}

pub fn property(dict: &Dict, name: &str) -> Option<Value> {
    let (_, seconds) = parts(dict);
    let value = match name {
        "days" => seconds / DAY,
        "hours" => seconds / HOUR,
        "minutes" => seconds / MINUTE,
        _ => return None,
    };
    Some(Value::Int(value))
}

/// Component-wise arithmetic on two durations.
pub fn combine(left: &Dict, right: &Dict, subtract: bool) -> Result<Value, EvalError> {
    let (lm, ls) = parts(left);
    let (rm, rs) = parts(right);
    let (months, seconds) = if subtract {
        (lm.checked_sub(rm), ls.checked_sub(rs))
    } else {
        (lm.checked_add(rm), ls.checked_add(rs))
    };
    match (months, seconds) {
        (Some(months), Some(seconds)) => Ok(new(months, seconds)),
        _ => Err(integer_overflow("duration arithmetic")),
    }
}

pub fn scale(dict: &Dict, factor: i64) -> Result<Value, EvalError> {
    let (months, seconds) = parts(dict);
    match (months.checked_mul(factor), seconds.checked_mul(factor)) {
        (Some(months), Some(seconds)) => Ok(new(months, seconds)),
        _ => Err(integer_overflow("duration arithmetic")),
    }
}

pub fn negate(dict: &Dict) -> Result<Value, EvalError> {
    scale(dict, -1)
}

/// Approximate total length in seconds, for ordering (a month counts as 30 days).
pub fn approx_seconds(dict: &Dict) -> i128 {
    let (months, seconds) = parts(dict);
    i128::from(months) * i128::from(30 * DAY) + i128::from(seconds)
}
