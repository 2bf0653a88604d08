//! CSV with a header row.
//!
//! Decoding yields an array of dictionaries keyed by the header. Encoding
//! accepts an array of dictionaries (header from the first row's keys) or
//! an array of arrays (no header). Fields containing `,`, `"` or a line
//! break are quoted; quotes inside are doubled.

use super::CodecError;
use crate::value::{render, Dict, Slot, Value};

pub fn decode(text: &str) -> Result<Value, CodecError> {
    let mut rows = parse_rows(text)?.into_iter();
    let Some(header) = rows.next() else {
        return Ok(Value::array(Vec::new()));
    };
    let records = rows
        .filter(|row| !(row.len() == 1 && row[0].is_empty()))
        .map(|row| {
            let dict = Dict::from_values(header.iter().enumerate().map(|(i, key)| {
                let value = row.get(i).map_or(Value::Null, |field| Value::from(field.as_str()));
                (key.as_str(), value)
            }));
            Value::Dict(dict)
        })
        .collect();
    Ok(Value::array(records))
}

fn parse_rows(text: &str) -> Result<Vec<Vec<String>>, CodecError> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut chars = text.chars().peekable();
    let mut in_quotes = false;
    let mut any = false;

    while let Some(c) = chars.next() {
        any = true;
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
                any = false;
            }
            _ => field.push(c),
        }
    }
    if in_quotes {
        return Err(CodecError::Decode {
            format: "csv",
            message: "unterminated quoted field".to_string(),
        });
    }
    if any {
        row.push(field);
        rows.push(row);
    }
    Ok(rows)
}

pub fn encode(value: &Value) -> Result<String, CodecError> {
    let error = |value: &Value| CodecError::Encode {
        format: "csv",
        type_name: value.type_name(),
    };
    let Value::Array(rows) = value else {
        return Err(error(value));
    };
    let mut out = String::new();
    let header: Option<Vec<String>> = match rows.first() {
        Some(Value::Dict(first)) => Some(first.read().keys().map(ToString::to_string).collect()),
        _ => None,
    };
    if let Some(header) = &header {
        write_row(&mut out, header.iter().map(String::as_str));
    }
    for row in rows.iter() {
        match (row, &header) {
            (Value::Dict(dict), Some(header)) => {
                let data = dict.read();
                let fields: Vec<String> = header
                    .iter()
                    .map(|key| match data.get(key) {
                        Some(Slot::Ready(value)) => render(value),
                        _ => String::new(),
                    })
                    .collect();
                write_row(&mut out, fields.iter().map(String::as_str));
            }
            (Value::Array(items), None) => {
                let fields: Vec<String> = items.iter().map(render).collect();
                write_row(&mut out, fields.iter().map(String::as_str));
            }
            (other, _) => return Err(error(other)),
        }
    }
    Ok(out)
}

fn write_row<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}
