//! JSON conversion through `serde_json`.

use rustc_hash::FxHashSet;
use serde_json::{Map, Number, Value as Json};

use super::CodecError;
use crate::pseudo;
use crate::value::{render, Dict, Slot, Value};

pub fn decode(text: &str) -> Result<Value, CodecError> {
    let json: Json = serde_json::from_str(text).map_err(|e| CodecError::Decode {
        format: "json",
        message: e.to_string(),
    })?;
    Ok(from_json(json))
}

pub fn from_json(json: Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => Value::from(s),
        Json::Array(items) => Value::array(items.into_iter().map(from_json).collect()),
        Json::Object(map) => Value::Dict(Dict::from_values(
            map.into_iter().map(|(key, value)| (key, from_json(value))),
        )),
    }
}

/// Convert to JSON. Pseudo-types become their canonical text; functions
/// and cycles become `null`.
pub fn to_json(value: &Value) -> Json {
    to_json_inner(value, &mut FxHashSet::default())
}

fn to_json_inner(value: &Value, visiting: &mut FxHashSet<usize>) -> Json {
    match value {
        Value::Null | Value::Function(_) | Value::Builtin(_) => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(n) => Json::Number((*n).into()),
        Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::Str(s) => Json::String(s.to_string()),
        Value::Error(error) => Json::String(error.message.clone()),
        Value::Array(items) => Json::Array(items.iter().map(|v| to_json_inner(v, visiting)).collect()),
        Value::Dict(dict) => {
            if let Some(text) = pseudo::render(dict) {
                return Json::String(text);
            }
            if !visiting.insert(dict.addr()) {
                return Json::Null;
            }
            let data = dict.read();
            let mut map = Map::new();
            for (key, slot) in data.iter() {
                let value = match slot {
                    Slot::Ready(value) => to_json_inner(value, visiting),
                    Slot::Pending(_) | Slot::Forcing => Json::Null,
                };
                map.insert(key.to_string(), value);
            }
            drop(data);
            visiting.remove(&dict.addr());
            Json::Object(map)
        }
    }
}

pub fn encode_pretty(value: &Value) -> String {
    let json = to_json(value);
    serde_json::to_string_pretty(&json).unwrap_or_else(|_| render(value))
}
