//! URLs: `@https://example.com:8080/a?q=1#top`.

use super::{field, str_field, tagged, PseudoKind};
use crate::errors::{invalid_value, EvalError};
use crate::value::{Dict, Value};

pub fn parse(text: &str) -> Result<Value, EvalError> {
    let invalid = || invalid_value(format!("invalid url `{text}`"));
    let (scheme, rest) = text.split_once("://").ok_or_else(invalid)?;
    if scheme.is_empty() || !scheme.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(invalid());
    }

    let (rest, fragment) = rest.split_once('#').unwrap_or((rest, ""));
    let (rest, query) = rest.split_once('?').unwrap_or((rest, ""));
    let (authority, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, ""),
    };
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let (host, port) = match host_port.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            (host, Value::Int(port.parse().map_err(|_| invalid())?))
        }
        _ => (host_port, Value::Null),
    };

    Ok(tagged(
        PseudoKind::Url,
        vec![
            ("scheme", Value::from(scheme.to_ascii_lowercase())),
            ("host", Value::from(host)),
            ("port", port),
            ("path", Value::from(path)),
            ("query", Value::from(query)),
            ("fragment", Value::from(fragment)),
        ],
    ))
}

fn origin(dict: &Dict) -> String {
    let mut out = format!("{}://{}", str_field(dict, "scheme"), str_field(dict, "host"));
    if let Some(port) = field(dict, "port").as_int() {
        out.push(':');
        out.push_str(&port.to_string());
    }
    out
}

pub fn render(dict: &Dict) -> String {
    let mut out = origin(dict);
    out.push_str(&str_field(dict, "path"));
    let query = str_field(dict, "query");
    if !query.is_empty() {
        out.push('?');
        out.push_str(&query);
    }
    let fragment = str_field(dict, "fragment");
    if !fragment.is_empty() {
        out.push('#');
        out.push_str(&fragment);
    }
    out
}

pub fn property(dict: &Dict, name: &str) -> Option<Value> {
    match name {
        "origin" => Some(Value::from(origin(dict))),
        "string" => Some(Value::from(render(dict))),
        _ => None,
    }
}

/// `url + "segment"`: extend the path, keeping query and fragment.
pub fn extend(dict: &Dict, segment: &str) -> Value {
    let copy = dict.shallow_copy();
    let path = str_field(dict, "path");
    let joined = format!(
        "{}/{}",
        path.trim_end_matches('/'),
        segment.trim_start_matches('/')
    );
    copy.set("path", Value::from(joined));
    Value::Dict(copy)
}
