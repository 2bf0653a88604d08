use pretty_assertions::assert_eq;

use super::*;
use crate::value::render as render_value;

fn dict(value: &Value) -> &Dict {
    match value {
        Value::Dict(dict) => dict,
        other => panic!("expected dictionary, got {other:?}"),
    }
}

#[test]
fn datetime_fields_and_rendering() {
    let value = datetime::parse("2024-01-15").unwrap();
    let d = dict(&value);
    assert_eq!(kind_of(&value), Some(PseudoKind::DateTime));
    assert_eq!(int_field(d, "year"), 2024);
    assert_eq!(int_field(d, "month"), 1);
    assert_eq!(int_field(d, "day"), 15);
    assert_eq!(render_value(&value), "2024-01-15");
    assert_eq!(
        render_value(&property(d, "weekday").unwrap().unwrap()),
        "Monday"
    );
}

#[test]
fn datetime_with_offset() {
    let value = datetime::parse("2024-01-15T10:30:00+02:00").unwrap();
    let d = dict(&value);
    assert_eq!(int_field(d, "hour"), 10);
    assert_eq!(int_field(d, "offset"), 7200);
    assert_eq!(render_value(&value), "2024-01-15T10:30:00+02:00");
    let utc = datetime::parse("2024-01-15T08:30:00Z").unwrap();
    assert_eq!(int_field(d, "unix"), int_field(dict(&utc), "unix"));
    assert_eq!(render_value(&utc), "2024-01-15T08:30:00Z");
}

#[test]
fn time_of_day() {
    let value = datetime::parse("T10:30").unwrap();
    assert_eq!(render_value(&value), "10:30:00");
}

#[test]
fn invalid_datetime() {
    assert!(datetime::parse("2024-13-45").is_err());
}

#[test]
fn month_arithmetic_clamps_day() {
    let start = datetime::parse("2024-01-31").unwrap();
    let month = duration::parse("1mo").unwrap();
    let shifted = datetime::shift(dict(&start), dict(&month), false).unwrap();
    assert_eq!(render_value(&shifted), "2024-02-29");
}

#[test]
fn datetime_difference_is_duration() {
    let a = datetime::parse("2024-01-15").unwrap();
    let b = datetime::parse("2024-01-10").unwrap();
    let diff = datetime::difference(dict(&a), dict(&b)).unwrap();
    assert_eq!(render_value(&diff), "5d");
    assert_eq!(
        duration::property(dict(&diff), "hours").and_then(|v| v.as_int()),
        Some(120)
    );
}

#[test]
fn durations_parse_and_render() {
    let value = duration::parse("1y2mo3w4d5h6m7s").unwrap();
    let d = dict(&value);
    assert_eq!(duration::parts(d), (14, 25 * 86_400 + 5 * 3600 + 6 * 60 + 7));
    assert_eq!(render_value(&value), "1y2mo25d5h6m7s");
    assert_eq!(render_value(&duration::parse("-90m").unwrap()), "-1h30m");
    assert_eq!(render_value(&duration::new(0, 0)), "0s");
    assert!(duration::parse("5x").is_err());
}

#[test]
fn path_properties() {
    let value = path::new("./data/report.final.csv");
    let d = dict(&value);
    let prop = |name| render_value(&path::property(d, name).unwrap());
    assert_eq!(prop("basename"), "report.final.csv");
    assert_eq!(prop("stem"), "report.final");
    assert_eq!(prop("ext"), "csv");
    assert_eq!(prop("dirname"), "./data");
    assert_eq!(prop("absolute"), "false");
    assert_eq!(path::join("./data", "x.json"), "./data/x.json");
    assert_eq!(path::join("./data/", "/abs"), "/abs");
}

#[test]
fn url_parts() {
    let value = url::parse("https://example.com:8080/a/b?q=1#top").unwrap();
    let d = dict(&value);
    assert_eq!(str_field(d, "host"), "example.com");
    assert_eq!(field(d, "port").as_int(), Some(8080));
    assert_eq!(str_field(d, "path"), "/a/b");
    assert_eq!(str_field(d, "query"), "q=1");
    assert_eq!(str_field(d, "fragment"), "top");
    assert_eq!(
        render_value(&url::property(d, "origin").unwrap()),
        "https://example.com:8080"
    );
    assert_eq!(render_value(&value), "https://example.com:8080/a/b?q=1#top");
    let extended = url::extend(d, "c");
    assert_eq!(render_value(&extended), "https://example.com:8080/a/b/c?q=1#top");
}

#[test]
fn regex_captures() {
    let re = regex::compile("(\\w+)@(\\w+)?x", "i").unwrap();
    let caps = regex::captures(&re, "MAIL: bob@X");
    assert_eq!(format!("{caps:?}"), r#"[Str("bob@X"), Str("bob"), Null]"#);
    assert!(regex::captures(&re, "nothing").is_null());
    assert!(regex::new("(", "").is_err());
    assert!(regex::new("a", "q").is_err());
    assert_eq!(render_value(&regex::new("a+", "i").unwrap()), "/a+/i");
}

#[test]
fn at_literals_dispatch_by_kind() {
    use quill_ir::AtKind;
    assert_eq!(
        kind_of(&from_at(AtKind::Path, "./x").unwrap()),
        Some(PseudoKind::Path)
    );
    assert_eq!(
        kind_of(&from_at(AtKind::Duration, "1h").unwrap()),
        Some(PseudoKind::Duration)
    );
    assert!(kind_of(&Value::Int(1)).is_none());
}
