//! Pseudo-types: dictionaries tagged with a `__type` key.
//!
//! Dates, durations, paths, URLs, regexes and file handles are ordinary
//! dictionaries whose stored fields can be destructured and iterated. The
//! tag routes dot access to computed properties, rendering to a canonical
//! text form, and operators to type-aware behavior. Anything not handled
//! here falls through to plain dictionary lookup.

pub mod datetime;
pub mod duration;
pub mod file;
pub mod path;
pub mod regex;
pub mod url;

use quill_ir::AtKind;

use crate::errors::EvalError;
use crate::value::{Dict, Value};

/// Reserved discriminator key.
pub const TYPE_KEY: &str = "__type";

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PseudoKind {
    DateTime,
    Duration,
    Path,
    Url,
    Regex,
    File,
}

impl PseudoKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            PseudoKind::DateTime => "datetime",
            PseudoKind::Duration => "duration",
            PseudoKind::Path => "path",
            PseudoKind::Url => "url",
            PseudoKind::Regex => "regex",
            PseudoKind::File => "file",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "datetime" => PseudoKind::DateTime,
            "duration" => PseudoKind::Duration,
            "path" => PseudoKind::Path,
            "url" => PseudoKind::Url,
            "regex" => PseudoKind::Regex,
            "file" => PseudoKind::File,
            _ => return None,
        })
    }
}

pub fn kind_of_dict(dict: &Dict) -> Option<PseudoKind> {
    PseudoKind::from_tag(&dict.type_tag()?)
}

pub fn kind_of(value: &Value) -> Option<PseudoKind> {
    match value {
        Value::Dict(dict) => kind_of_dict(dict),
        _ => None,
    }
}

/// A tagged dictionary with `fields` after the tag.
pub(crate) fn tagged(kind: PseudoKind, fields: Vec<(&'static str, Value)>) -> Value {
    let dict = Dict::from_values(std::iter::once((TYPE_KEY, Value::from(kind.as_str()))).chain(fields));
    Value::Dict(dict)
}

/// Stored field of a pseudo-type dictionary.
pub(crate) fn field(dict: &Dict, key: &str) -> Value {
    dict.get_ready(key).unwrap_or(Value::Null)
}

pub(crate) fn int_field(dict: &Dict, key: &str) -> i64 {
    field(dict, key).as_int().unwrap_or(0)
}

pub(crate) fn str_field(dict: &Dict, key: &str) -> String {
    match field(dict, key) {
        Value::Str(s) => s.to_string(),
        _ => String::new(),
    }
}

/// Canonical text of a pseudo-type; `None` for plain dictionaries.
pub fn render(dict: &Dict) -> Option<String> {
    Some(match kind_of_dict(dict)? {
        PseudoKind::DateTime => datetime::render(dict),
        PseudoKind::Duration => duration::render(dict),
        PseudoKind::Path | PseudoKind::File => str_field(dict, "path"),
        PseudoKind::Url => url::render(dict),
        PseudoKind::Regex => regex::render(dict),
    })
}

/// Computed property `name`, or `None` to fall back to stored fields.
pub fn property(dict: &Dict, name: &str) -> Result<Option<Value>, EvalError> {
    match kind_of_dict(dict) {
        Some(PseudoKind::DateTime) => datetime::property(dict, name),
        Some(PseudoKind::Duration) => Ok(duration::property(dict, name)),
        Some(PseudoKind::Path) => Ok(path::property(dict, name)),
        Some(PseudoKind::Url) => Ok(url::property(dict, name)),
        Some(PseudoKind::Regex | PseudoKind::File) | None => Ok(None),
    }
}

/// Build the value of an `@` literal from its text.
pub fn from_at(kind: AtKind, text: &str) -> Result<Value, EvalError> {
    match kind {
        AtKind::DateTime => datetime::parse(text),
        AtKind::Duration => duration::parse(text),
        AtKind::Path => Ok(path::new(text)),
        AtKind::Url => url::parse(text),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
