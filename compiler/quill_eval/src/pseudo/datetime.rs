//! Dates and times: `@2024-01-15`, `@2024-01-15T10:30:00+02:00`, `@T10:30`.
//!
//! The stored fields are the calendar components in the value's own
//! offset, plus `unix` (seconds since the epoch), `offset` (seconds east of
//! UTC) and `kind` (`date`, `datetime` or `time`). Arithmetic goes through
//! `unix` and `offset`.

use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveTime, SecondsFormat, TimeDelta,
    TimeZone, Timelike, Utc, Weekday,
};

use super::{duration, int_field, str_field, tagged, PseudoKind};
use crate::errors::{invalid_value, EvalError};
use crate::value::{Dict, Value};

const KIND_DATE: &str = "date";
const KIND_DATETIME: &str = "datetime";
const KIND_TIME: &str = "time";

pub fn from_chrono(dt: DateTime<FixedOffset>, kind: &str) -> Value {
    tagged(
        PseudoKind::DateTime,
        vec![
            ("year", Value::Int(i64::from(dt.year()))),
            ("month", Value::Int(i64::from(dt.month()))),
            ("day", Value::Int(i64::from(dt.day()))),
            ("hour", Value::Int(i64::from(dt.hour()))),
            ("minute", Value::Int(i64::from(dt.minute()))),
            ("second", Value::Int(i64::from(dt.second()))),
            ("unix", Value::Int(dt.timestamp())),
            ("offset", Value::Int(i64::from(dt.offset().local_minus_utc()))),
            ("kind", Value::from(kind)),
        ],
    )
}

pub fn to_chrono(dict: &Dict) -> Result<DateTime<FixedOffset>, EvalError> {
    let offset = i32::try_from(int_field(dict, "offset"))
        .ok()
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| invalid_value("datetime has an invalid offset"))?;
    offset
        .timestamp_opt(int_field(dict, "unix"), 0)
        .single()
        .ok_or_else(|| invalid_value("datetime is out of range"))
}

pub fn now() -> Value {
    from_chrono(Utc::now().fixed_offset(), KIND_DATETIME)
}

/// UTC datetime from seconds since the epoch.
pub fn from_unix(seconds: i64) -> Result<Value, EvalError> {
    let dt = DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| invalid_value(format!("timestamp {seconds} is out of range")))?;
    Ok(from_chrono(dt.fixed_offset(), KIND_DATETIME))
}

/// Parse ISO-8601 text: a date, a date and time with optional offset, or
/// a `T`-prefixed time of day.
pub fn parse(text: &str) -> Result<Value, EvalError> {
    let invalid = || invalid_value(format!("invalid datetime `{text}`"));
    let (date_text, time_text) = match text.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (text, None),
    };

    let (kind, date) = if date_text.is_empty() {
        (KIND_TIME, NaiveDate::from_ymd_opt(1970, 1, 1).ok_or_else(invalid)?)
    } else {
        let date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d").map_err(|_| invalid())?;
        (if time_text.is_some() { KIND_DATETIME } else { KIND_DATE }, date)
    };

    let (time, offset) = match time_text {
        Some(time_text) => {
            let (clock, offset) = split_offset(time_text).ok_or_else(invalid)?;
            let time = NaiveTime::parse_from_str(clock, "%H:%M:%S%.f")
                .or_else(|_| NaiveTime::parse_from_str(clock, "%H:%M"))
                .map_err(|_| invalid())?;
            (time, offset)
        }
        None => (NaiveTime::MIN, 0),
    };

    let offset = FixedOffset::east_opt(offset).ok_or_else(invalid)?;
    let dt = offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(invalid)?;
    Ok(from_chrono(dt, kind))
}

/// Split `10:30:00+02:00` into the clock text and the offset in seconds.
fn split_offset(text: &str) -> Option<(&str, i32)> {
    if let Some(clock) = text.strip_suffix('Z') {
        return Some((clock, 0));
    }
    let sign_at = text.rfind(['+', '-']);
    match sign_at {
        Some(i) if text.len() - i == 6 => {
            let sign = if text.as_bytes()[i] == b'-' { -1 } else { 1 };
            let hours: i32 = text.get(i + 1..i + 3)?.parse().ok()?;
            let minutes: i32 = text.get(i + 4..i + 6)?.parse().ok()?;
            Some((&text[..i], sign * (hours * 3600 + minutes * 60)))
        }
        _ => Some((text, 0)),
    }
}

pub fn render(dict: &Dict) -> String {
    let Ok(dt) = to_chrono(dict) else {
        return String::new();
    };
    match str_field(dict, "kind").as_str() {
        KIND_DATE => dt.format("%Y-%m-%d").to_string(),
        KIND_TIME => dt.format("%H:%M:%S").to_string(),
        _ => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

pub fn property(dict: &Dict, name: &str) -> Result<Option<Value>, EvalError> {
    let value = match name {
        "weekday" => Value::from(weekday_name(to_chrono(dict)?.weekday())),
        "iso" => Value::from(to_chrono(dict)?.to_rfc3339_opts(SecondsFormat::Secs, true)),
        "date" => Value::from(to_chrono(dict)?.format("%Y-%m-%d").to_string()),
        "time" => Value::from(to_chrono(dict)?.format("%H:%M:%S").to_string()),
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// `datetime ± duration`. Calendar months are applied first, then seconds.
pub fn shift(dict: &Dict, by: &Dict, subtract: bool) -> Result<Value, EvalError> {
    let out_of_range = || invalid_value("datetime arithmetic out of range");
    let dt = to_chrono(dict)?;
    let (months, seconds) = duration::parts(by);
    let (months, seconds) = if subtract {
        (months.checked_neg(), seconds.checked_neg())
    } else {
        (Some(months), Some(seconds))
    };
    let (months, seconds) = months.zip(seconds).ok_or_else(out_of_range)?;

    let magnitude = u32::try_from(months.unsigned_abs()).map_err(|_| out_of_range())?;
    let dt = if months >= 0 {
        dt.checked_add_months(Months::new(magnitude))
    } else {
        dt.checked_sub_months(Months::new(magnitude))
    }
    .ok_or_else(out_of_range)?;
    let dt = TimeDelta::try_seconds(seconds)
        .and_then(|delta| dt.checked_add_signed(delta))
        .ok_or_else(out_of_range)?;

    let kind = str_field(dict, "kind");
    let kind = if kind == KIND_DATE && seconds % 86_400 != 0 {
        KIND_DATETIME
    } else {
        kind.as_str()
    };
    Ok(from_chrono(dt, kind))
}

/// `datetime - datetime`: an exact duration in seconds.
pub fn difference(left: &Dict, right: &Dict) -> Result<Value, EvalError> {
    let seconds = to_chrono(left)?.timestamp() - to_chrono(right)?.timestamp();
    Ok(duration::new(0, seconds))
}

/// Seconds since the epoch, for ordering.
pub fn instant(dict: &Dict) -> i64 {
    int_field(dict, "unix")
}
