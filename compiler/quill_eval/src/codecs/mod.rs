//! Format codecs used by `<==` and `==>`.
//!
//! Codecs are pure: bytes in, value out, and back. Values handed to
//! [`encode`] must already be forced (no pending dictionary fields).

mod csv;
pub mod json;

use crate::value::{render, Value};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Format {
    Json,
    Csv,
    /// One string per line.
    Lines,
    /// The whole file as one string.
    Text,
    /// An array of byte values.
    Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("invalid {format} data: {message}")]
    Decode { format: &'static str, message: String },
    #[error("cannot encode {type_name} as {format}")]
    Encode {
        format: &'static str,
        type_name: &'static str,
    },
}

impl Format {
    pub const fn as_str(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Csv => "csv",
            Format::Lines => "lines",
            Format::Text => "text",
            Format::Bytes => "bytes",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "json" => Format::Json,
            "csv" => Format::Csv,
            "lines" => Format::Lines,
            "text" => Format::Text,
            "bytes" => Format::Bytes,
            _ => return None,
        })
    }

    /// Guess from a file extension; anything unknown is text.
    pub fn from_path(path: &str) -> Self {
        let ext = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Format::Json,
            Some("csv") => Format::Csv,
            _ => Format::Text,
        }
    }
}

fn utf8(bytes: &[u8], format: Format) -> Result<&str, CodecError> {
    std::str::from_utf8(bytes).map_err(|e| CodecError::Decode {
        format: format.as_str(),
        message: e.to_string(),
    })
}

pub fn decode(bytes: &[u8], format: Format) -> Result<Value, CodecError> {
    match format {
        Format::Json => json::decode(utf8(bytes, format)?),
        Format::Csv => csv::decode(utf8(bytes, format)?),
        Format::Lines => Ok(Value::array(
            utf8(bytes, format)?
                .lines()
                .map(Value::from)
                .collect(),
        )),
        Format::Text => Ok(Value::from(utf8(bytes, format)?)),
        Format::Bytes => Ok(Value::array(
            bytes.iter().map(|&b| Value::Int(i64::from(b))).collect(),
        )),
    }
}

pub fn encode(value: &Value, format: Format) -> Result<Vec<u8>, CodecError> {
    match format {
        Format::Json => Ok(json::encode_pretty(value).into_bytes()),
        Format::Csv => csv::encode(value).map(String::into_bytes),
        Format::Lines => {
            let mut out = String::new();
            match value {
                Value::Array(items) => {
                    for item in items.iter() {
                        out.push_str(&render(item));
                        out.push('\n');
                    }
                }
                other => {
                    out.push_str(&render(other));
                    out.push('\n');
                }
            }
            Ok(out.into_bytes())
        }
        Format::Text => Ok(render(value).into_bytes()),
        Format::Bytes => match value {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Int(n) => u8::try_from(*n).map_err(|_| encode_error(format, item)),
                    other => Err(encode_error(format, other)),
                })
                .collect(),
            Value::Str(s) => Ok(s.as_bytes().to_vec()),
            other => Err(encode_error(format, other)),
        },
    }
}

fn encode_error(format: Format, value: &Value) -> CodecError {
    CodecError::Encode {
        format: format.as_str(),
        type_name: value.type_name(),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
