//! Turning values into text.
//!
//! Rendering is what interpolation, tag children, `print` and `str()` see:
//! `null` is empty, arrays concatenate their elements, pseudo-types use
//! their canonical text and plain dictionaries become JSON.
//!
//! Pending dictionary fields render as `null`; callers force values first
//! (see `Interpreter::resolve`).

use super::Value;
use crate::codecs::json;
use crate::pseudo;

pub fn render(value: &Value) -> String {
    let mut out = String::new();
    render_into(value, &mut out);
    out
}

fn render_into(value: &Value, out: &mut String) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Float(f) => out.push_str(&render_float(*f)),
        Value::Str(s) => out.push_str(s),
        Value::Array(items) => {
            for item in items.iter() {
                render_into(item, out);
            }
        }
        Value::Dict(dict) => match pseudo::render(dict) {
            Some(text) => out.push_str(&text),
            None => out.push_str(&json::to_json(value).to_string()),
        },
        Value::Function(func) => {
            out.push_str("<function ");
            out.push_str(func.name.as_deref().unwrap_or("anonymous"));
            out.push('>');
        }
        Value::Builtin(builtin) => {
            out.push_str("<builtin ");
            out.push_str(builtin.name);
            out.push('>');
        }
        Value::Error(error) => out.push_str(&error.message),
    }
}

/// Floats keep a fractional part so they read back as floats.
pub fn render_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}
