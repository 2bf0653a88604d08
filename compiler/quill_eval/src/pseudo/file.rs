//! File handles: `JSON(@./data.json)`, `lines(@./log.txt)`, ...
//!
//! A handle pairs a path with the codec used by `<==` and `==>`.

use super::{str_field, tagged, PseudoKind};
use crate::codecs::Format;
use crate::value::{Dict, Value};

pub fn new(path: &str, format: Format) -> Value {
    tagged(
        PseudoKind::File,
        vec![("path", Value::from(path)), ("format", Value::from(format.as_str()))],
    )
}

pub fn path(dict: &Dict) -> String {
    str_field(dict, "path")
}

pub fn format(dict: &Dict) -> Format {
    Format::from_name(&str_field(dict, "format")).unwrap_or(Format::Text)
}
