use pretty_assertions::assert_eq;

use super::*;
use crate::value::Dict;

fn text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

#[test]
fn json_keeps_key_order() {
    let value = decode(br#"{"b": 1, "a": [true, null, 2.5], "c": {"d": "x"}}"#, Format::Json).unwrap();
    assert_eq!(render(&value), r#"{"b":1,"a":[true,null,2.5],"c":{"d":"x"}}"#);
}

#[test]
fn json_decode_error() {
    let error = decode(b"{oops", Format::Json).unwrap_err();
    assert!(error.to_string().starts_with("invalid json data"));
}

#[test]
fn json_encode_is_pretty() {
    let value = Value::Dict(Dict::from_values([("a", Value::Int(1))]));
    assert_eq!(text(encode(&value, Format::Json).unwrap()), "{\n  \"a\": 1\n}");
}

#[test]
fn csv_roundtrip_with_quotes() {
    let source = "name,note\nann,\"hello, world\"\nbob,\"say \"\"hi\"\"\"\n";
    let value = decode(source.as_bytes(), Format::Csv).unwrap();
    let Value::Array(rows) = &value else {
        panic!("expected rows");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(render(&rows[0]), r#"{"name":"ann","note":"hello, world"}"#);
    assert_eq!(text(encode(&value, Format::Csv).unwrap()), source);
}

#[test]
fn csv_of_arrays_has_no_header() {
    let value = Value::array(vec![
        Value::array(vec![Value::Int(1), Value::from("a")]),
        Value::array(vec![Value::Int(2), Value::from("b")]),
    ]);
    assert_eq!(text(encode(&value, Format::Csv).unwrap()), "1,a\n2,b\n");
    assert!(encode(&Value::Int(1), Format::Csv).is_err());
}

#[test]
fn lines_and_text() {
    let value = decode(b"one\ntwo\n", Format::Lines).unwrap();
    assert_eq!(format!("{value:?}"), r#"[Str("one"), Str("two")]"#);
    assert_eq!(text(encode(&value, Format::Lines).unwrap()), "one\ntwo\n");
    assert_eq!(render(&decode(b"raw", Format::Text).unwrap()), "raw");
}

#[test]
fn bytes_codec() {
    let value = decode(&[104, 105], Format::Bytes).unwrap();
    assert_eq!(encode(&value, Format::Bytes).unwrap(), vec![104, 105]);
    let bad = Value::array(vec![Value::Int(300)]);
    assert!(encode(&bad, Format::Bytes).is_err());
}

#[test]
fn formats_from_paths() {
    assert_eq!(Format::from_path("a/b.JSON"), Format::Json);
    assert_eq!(Format::from_path("x.csv"), Format::Csv);
    assert_eq!(Format::from_path("notes"), Format::Text);
    assert_eq!(Format::from_name("Lines"), Some(Format::Lines));
    assert_eq!(Format::from_name("yaml"), None);
}
