//! Dynamic field values.
//!
//! Form inputs arrive loosely typed: a text box yields a string, a checkbox a
//! boolean, a multi-select a list. `FieldValue` carries any of them and offers
//! the coercions the built-in checks are defined in terms of.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

static PARTIAL_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})(?:-([0-9]{2}))?$").expect("valid partial date regex")
});

/// A value entered into a form field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Missing or explicitly empty value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// List value (multi-selects, tag inputs)
    List(Vec<FieldValue>),
    /// Nested object value
    Map(BTreeMap<String, FieldValue>),
}

/// The full bag of current form values, keyed by field name.
pub type FieldValues = HashMap<String, FieldValue>;

/// Builds a [`FieldValues`] bag from name/value pairs.
pub fn field_values<K, V, I>(pairs: I) -> FieldValues
where
    K: Into<String>,
    V: Into<FieldValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect()
}

impl FieldValue {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Attempts to get this value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for values that count as "empty" in a boolean context:
    /// null, `false`, zero, NaN and the empty string.
    ///
    /// Lists and maps are never falsy, even when empty.
    pub fn is_falsy(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Bool(b) => !b,
            FieldValue::Int(i) => *i == 0,
            FieldValue::Float(f) => *f == 0.0 || f.is_nan(),
            FieldValue::String(s) => s.is_empty(),
            FieldValue::List(_) | FieldValue::Map(_) => false,
        }
    }

    /// Returns true if the value has no content: null, a whitespace-only
    /// string or an empty list.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::String(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Coerces the value to its textual form.
    ///
    /// Integral floats drop the fractional part (`12.0` becomes `"12"`), list
    /// items are joined with commas and maps render as `[object Object]`.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Null => "null".to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(f) => format_number(*f),
            FieldValue::String(s) => s.clone(),
            FieldValue::List(items) => items
                .iter()
                .map(|item| {
                    if item.is_null() {
                        String::new()
                    } else {
                        item.to_text()
                    }
                })
                .collect::<Vec<_>>()
                .join(","),
            FieldValue::Map(_) => "[object Object]".to_string(),
        }
    }

    /// Coerces the value to a number. Unparsable input yields NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            FieldValue::Null => 0.0,
            FieldValue::Bool(b) => f64::from(u8::from(*b)),
            FieldValue::Int(i) => *i as f64,
            FieldValue::Float(f) => *f,
            FieldValue::String(s) => parse_number(s),
            FieldValue::List(items) => match items.as_slice() {
                [] | [FieldValue::Null] => 0.0,
                [single] => parse_number(&single.to_text()),
                _ => f64::NAN,
            },
            FieldValue::Map(_) => f64::NAN,
        }
    }

    /// Coerces the value to an instant.
    ///
    /// Numbers are milliseconds since the Unix epoch. Strings accept RFC 3339,
    /// RFC 2822, `YYYY-MM-DD`, `YYYY/MM/DD`, the partial forms `YYYY-MM` and
    /// `YYYY`, `MM/DD/YYYY`, `Month DD, YYYY` and date-times without an offset
    /// (read as UTC). Returns `None` for anything that is not a valid date.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Null | FieldValue::Map(_) => None,
            FieldValue::Bool(b) => DateTime::from_timestamp_millis(i64::from(*b)),
            FieldValue::Int(millis) => DateTime::from_timestamp_millis(*millis),
            FieldValue::Float(f) if f.is_finite() => {
                DateTime::from_timestamp_millis(f.trunc() as i64)
            }
            FieldValue::Float(_) => None,
            FieldValue::String(s) => parse_datetime(s),
            FieldValue::List(_) => parse_datetime(&self.to_text()),
        }
    }
}

/// Renders a float the way form inputs display numbers.
pub(crate) fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = text.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }

    // Rust's float parser also accepts "inf" and "nan" spellings
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return f64::NAN;
    }

    text.parse().unwrap_or(f64::NAN)
}

fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    parse_partial_date(text).and_then(|date| date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()))
}

/// `YYYY-MM` is the first of the month, `YYYY` is January 1.
fn parse_partial_date(text: &str) -> Option<NaiveDate> {
    let caps = PARTIAL_DATE_REGEX.captures(text)?;
    let year = caps[1].parse().ok()?;
    let month = caps.get(2).map_or(Some(1), |m| m.as_str().parse().ok())?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(items: Vec<FieldValue>) -> Self {
        FieldValue::List(items)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => FieldValue::String(s),
            Value::Array(items) => FieldValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                FieldValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}
