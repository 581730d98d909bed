//! Built-in check logic.
//!
//! Every check except `required` passes trivially on an empty value, so a
//! format rule never doubles as a presence rule:
//! - `required`: null, whitespace-only strings and empty lists fail
//! - length and format checks: skipped when the value is falsy
//! - `min`/`max`: skipped on null or the empty string
//! - `unique`: reserved, always passes

use chrono::{DateTime, Utc};
use formrules_core::{Check, FieldValue};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{1,14}$").expect("valid phone regex"));

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?([0-9a-z.-]+)\.([a-z.]{2,6})([/0-9A-Za-z_ .-]*)*/?$")
        .expect("valid url regex")
});

static IBAN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}[0-9]{2}[A-Z0-9]{4,30}$").expect("valid iban regex"));

static INTEGER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("valid integer regex"));

static UNBOUNDED_DECIMAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("valid decimal regex"));

/// Compiled decimal formats by allowed fraction digits.
static DECIMAL_REGEXES: LazyLock<Mutex<HashMap<u32, Regex>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

static ANY_TEXT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+$").expect("valid fallback regex"));

/// Tax registration formats by country code.
static TAX_PATTERNS: LazyLock<HashMap<&'static str, Regex>> = LazyLock::new(|| {
    [
        ("SA", r"^[0-9]{15}$"),      // Saudi Arabia VAT
        ("AE", r"^[0-9]{15}$"),      // UAE TRN
        ("EG", r"^[0-9]{9}$"),       // Egypt tax ID
        ("US", r"^[0-9]{2}-[0-9]{7}$"), // US EIN
        ("UK", r"^GB[0-9]{9}$"),     // UK VAT
    ]
    .into_iter()
    .map(|(country, pattern)| (country, Regex::new(pattern).expect("valid tax regex")))
    .collect()
});

/// Country codes with a dedicated tax number format.
pub fn tax_countries() -> Vec<&'static str> {
    let mut countries: Vec<&'static str> = TAX_PATTERNS.keys().copied().collect();
    countries.sort_unstable();
    countries
}

/// Runs a built-in check.
///
/// `now` is the reference instant for `future` and `past`. Returns `None`
/// for `custom` checks, which need the async predicate path.
pub fn builtin_passes(check: &Check, value: &FieldValue, now: DateTime<Utc>) -> Option<bool> {
    let passed = match check {
        Check::Required => !value.is_blank(),
        Check::MinLength(min) => value.is_falsy() || text_len(value) >= *min,
        Check::MaxLength(max) => value.is_falsy() || text_len(value) <= *max,
        Check::Min(min) => is_unset(value) || value.to_number() >= *min,
        Check::Max(max) => is_unset(value) || value.to_number() <= *max,
        Check::Pattern(regex) => value.is_falsy() || regex.is_match(&value.to_text()),
        Check::Email => value.is_falsy() || EMAIL_REGEX.is_match(&value.to_text()),
        Check::Phone => value.is_falsy() || PHONE_REGEX.is_match(&compact_phone(value)),
        Check::Url => value.is_falsy() || URL_REGEX.is_match(&value.to_text()),
        Check::Iban => value.is_falsy() || IBAN_REGEX.is_match(&compact_iban(value)),
        Check::TaxNumber(country) => {
            value.is_falsy() || tax_pattern(country).is_match(&value.to_text())
        }
        Check::Decimal(places) => {
            value.is_falsy() || decimal_regex(*places).is_match(&value.to_text())
        }
        Check::Integer => value.is_falsy() || INTEGER_REGEX.is_match(&value.to_text()),
        Check::Date => value.is_falsy() || value.to_datetime().is_some(),
        Check::Future => value.is_falsy() || value.to_datetime().is_some_and(|d| d > now),
        Check::Past => value.is_falsy() || value.to_datetime().is_some_and(|d| d < now),
        Check::Unique => true,
        Check::Custom(_) => return None,
    };

    Some(passed)
}

/// Length in UTF-16 code units, as form inputs report it.
fn text_len(value: &FieldValue) -> usize {
    value.to_text().encode_utf16().count()
}

fn is_unset(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => true,
        FieldValue::String(s) => s.is_empty(),
        _ => false,
    }
}

fn compact_phone(value: &FieldValue) -> String {
    value
        .to_text()
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '(' | ')' | '-'))
        .collect()
}

fn compact_iban(value: &FieldValue) -> String {
    value
        .to_text()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

fn tax_pattern(country: &str) -> &'static Regex {
    TAX_PATTERNS.get(country).unwrap_or(&ANY_TEXT_REGEX)
}

/// Optional minus, digits, then optionally a dot and 1..=places digits.
fn decimal_regex(places: u32) -> Regex {
    let mut cache = DECIMAL_REGEXES.lock().unwrap_or_else(PoisonError::into_inner);
    cache
        .entry(places)
        .or_insert_with(|| {
            let pattern = match places {
                0 => r"^-?[0-9]+$".to_string(),
                n => format!(r"^-?[0-9]+(\.[0-9]{{1,{n}}})?$"),
            };
            // Bounds past the regex size limit are unbounded in practice
            Regex::new(&pattern).unwrap_or_else(|_| UNBOUNDED_DECIMAL_REGEX.clone())
        })
        .clone()
}
