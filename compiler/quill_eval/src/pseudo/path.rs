//! Filesystem paths: `@./data/x.json`, `@/etc`, `@~/notes`, `@-`.
//!
//! The path text is stored verbatim; it is resolved against the current
//! file's directory only when a file is actually opened.

use std::path::{Component, Path};

use super::{str_field, tagged, PseudoKind};
use crate::value::{Dict, Value};

pub fn new(text: &str) -> Value {
    tagged(PseudoKind::Path, vec![("path", Value::from(text))])
}

pub fn text(dict: &Dict) -> String {
    str_field(dict, "path")
}

/// `path + "x"` and `path / "x"`: append a segment.
pub fn join(base: &str, segment: &str) -> String {
    if segment.starts_with('/') || base.is_empty() {
        return segment.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), segment.trim_start_matches("./"))
}

pub fn property(dict: &Dict, name: &str) -> Option<Value> {
    let text = text(dict);
    let path = Path::new(&text);
    let os = |s: Option<&std::ffi::OsStr>| Value::from(s.map(|s| s.to_string_lossy().into_owned()).unwrap_or_default());
    Some(match name {
        "basename" => os(path.file_name()),
        "stem" => os(path.file_stem()),
        "ext" => os(path.extension()),
        "dirname" => {
            let parent = path.parent().map(|p| p.to_string_lossy().into_owned());
            new(match parent.as_deref() {
                None | Some("") => ".",
                Some(parent) => parent,
            })
        }
        "absolute" => Value::Bool(path.is_absolute()),
        "string" => Value::from(text.clone()),
        "components" => Value::array(
            path.components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(Value::from(part.to_string_lossy().into_owned())),
                    Component::ParentDir => Some(Value::from("..")),
                    Component::RootDir => Some(Value::from("/")),
                    Component::CurDir | Component::Prefix(_) => None,
                })
                .collect(),
        ),
        _ => return None,
    })
}
