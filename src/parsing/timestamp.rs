//! Best-effort timestamp interpretation.
//!
//! Interaction documents store times as Extended-JSON dates, epoch numbers,
//! or free-form strings in whatever format the producer liked. [`to_iso`]
//! turns any of them into ISO-8601 text and never fails: a string it cannot
//! read is returned verbatim.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use super::lookup::stringify;

/// Offset-aware layouts tried after RFC 3339 / RFC 2822.
const AWARE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f %:z",
];

/// Naive date-time layouts. Month-first numeric forms come before
/// day-first ones, so `01/02/2024` reads as January 2nd.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y, %I:%M:%S %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y, %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%d %B %Y %H:%M:%S",
    "%a %b %d %H:%M:%S %Y",
];

/// Date-only layouts; the time defaults to midnight.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
];

/// A successfully interpreted point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTimestamp {
    /// The source carried an explicit offset (or was an epoch value).
    Aware(DateTime<FixedOffset>),
    /// The source had no offset information.
    Naive(NaiveDateTime),
}

impl ParsedTimestamp {
    /// Renders as ISO-8601. Fractional seconds appear only when non-zero.
    pub fn to_iso(&self) -> String {
        match self {
            ParsedTimestamp::Aware(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, false),
            ParsedTimestamp::Naive(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        }
    }

    /// Converts to UTC, reading naive values as UTC.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            ParsedTimestamp::Aware(dt) => dt.to_utc(),
            ParsedTimestamp::Naive(dt) => dt.and_utc(),
        }
    }
}

impl From<DateTime<Utc>> for ParsedTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        ParsedTimestamp::Aware(dt.fixed_offset())
    }
}

/// Parses a free-form date string.
///
/// # Example
///
/// ```rust
/// use turnpack::parsing::timestamp::parse_datetime;
///
/// let ts = parse_datetime("2024-01-15T10:30:00Z").unwrap();
/// assert_eq!(ts.to_iso(), "2024-01-15T10:30:00+00:00");
///
/// let ts = parse_datetime("15/01/2024").unwrap();
/// assert_eq!(ts.to_iso(), "2024-01-15T00:00:00");
///
/// assert!(parse_datetime("ayer por la tarde").is_none());
/// ```
pub fn parse_datetime(input: &str) -> Option<ParsedTimestamp> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(ParsedTimestamp::Aware(dt));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(ParsedTimestamp::Aware(dt));
    }
    for fmt in AWARE_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(ParsedTimestamp::Aware(dt));
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ParsedTimestamp::Naive(dt));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(ParsedTimestamp::Naive);
        }
    }

    None
}

/// Interprets epoch seconds (fractional allowed) as a UTC instant.
///
/// Instants outside years 1 to 9999 are rejected, so a bare millisecond
/// count is not read as a date tens of millennia away.
pub fn from_epoch_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(whole as i64, nanos)
        .filter(|dt| (1..=9999).contains(&dt.year()))
}

fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Reads an Extended-JSON date object: `{"$date": ...}`.
fn extended_json_date(map: &Map<String, Value>) -> Option<ParsedTimestamp> {
    match map.get("$date")? {
        Value::String(s) => parse_datetime(s),
        Value::Number(n) => n.as_i64().and_then(from_epoch_millis).map(Into::into),
        Value::Object(inner) => inner
            .get("$numberLong")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(from_epoch_millis)
            .map(Into::into),
        _ => None,
    }
}

/// Interprets a value as a point in time without any string fallback.
///
/// Date objects and strings are parsed; numbers are epoch seconds.
pub fn interpret(value: &Value) -> Option<ParsedTimestamp> {
    match value {
        Value::Object(map) => extended_json_date(map),
        Value::Number(n) => n.as_f64().and_then(from_epoch_seconds).map(Into::into),
        Value::String(s) => parse_datetime(s),
        _ => None,
    }
}

/// Converts a raw timestamp value to ISO-8601 text.
///
/// - `null` → `None`
/// - Extended-JSON dates, epoch seconds and parseable strings → ISO-8601
/// - unparseable strings → the original string
/// - anything else → its JSON text
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use turnpack::parsing::timestamp::to_iso;
///
/// assert_eq!(to_iso(&json!(0)).as_deref(), Some("1970-01-01T00:00:00+00:00"));
/// assert_eq!(to_iso(&json!("mañana")).as_deref(), Some("mañana"));
/// assert_eq!(to_iso(&json!(null)), None);
/// ```
pub fn to_iso(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(parse_datetime(s).map_or_else(|| s.clone(), |ts| ts.to_iso())),
        other => Some(interpret(other).map_or_else(|| stringify(other), |ts| ts.to_iso())),
    }
}
