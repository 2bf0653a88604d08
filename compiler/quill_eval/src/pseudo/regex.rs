//! Regex values: `/pattern/flags` and `regex(pattern, flags)`.
//!
//! Flags are `i` (case-insensitive), `m` (multi-line), `s` (dot matches
//! newline) and `x` (ignore whitespace).

use regex::{Regex, RegexBuilder};

use super::{str_field, tagged, PseudoKind};
use crate::errors::{invalid_value, EvalError};
use crate::value::{Dict, Value};

pub fn new(pattern: &str, flags: &str) -> Result<Value, EvalError> {
    compile(pattern, flags)?;
    Ok(tagged(
        PseudoKind::Regex,
        vec![("pattern", Value::from(pattern)), ("flags", Value::from(flags))],
    ))
}

pub fn compile(pattern: &str, flags: &str) -> Result<Regex, EvalError> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            other => return Err(invalid_value(format!("unknown regex flag `{other}`"))),
        };
    }
    builder
        .build()
        .map_err(|e| invalid_value(format!("invalid regex /{pattern}/: {e}")))
}

pub fn compile_dict(dict: &Dict) -> Result<Regex, EvalError> {
    compile(&str_field(dict, "pattern"), &str_field(dict, "flags"))
}

/// The whole match followed by each group (`null` when a group did not
/// take part), or `null` when there is no match.
pub fn captures(re: &Regex, text: &str) -> Value {
    match re.captures(text) {
        Some(caps) => Value::array(
            caps.iter()
                .map(|group| group.map_or(Value::Null, |m| Value::from(m.as_str())))
                .collect(),
        ),
        None => Value::Null,
    }
}

pub fn render(dict: &Dict) -> String {
    format!("/{}/{}", str_field(dict, "pattern"), str_field(dict, "flags"))
}
