//! Evaluation output types.

use crate::RuleKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How serious a reported problem is.
///
/// Only `Error` is produced today; the other levels are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
            Severity::Info => f.write_str("info"),
        }
    }
}

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field the rule belongs to
    pub field: String,

    /// Which check failed
    #[serde(rename = "rule")]
    pub rule_kind: RuleKind,

    /// Resolved, human-readable message
    pub message: String,

    /// Severity of the failure
    pub severity: Severity,
}

impl ValidationError {
    /// Creates an error-severity entry.
    pub fn new(field: impl Into<String>, rule_kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule_kind,
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.field, self.rule_kind, self.message)
    }
}

/// Aggregate outcome of evaluating a whole form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// True if and only if `errors` is empty
    pub is_valid: bool,

    /// Every error-severity entry
    pub errors: Vec<ValidationError>,

    /// Every warning-severity entry
    pub warnings: Vec<ValidationError>,

    /// Entries grouped by field; fields without entries are absent
    pub field_errors: BTreeMap<String, Vec<ValidationError>>,
}

impl EvaluationResult {
    /// Creates an empty, valid result.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            ..Default::default()
        }
    }

    /// Builds a result from every entry produced for a form.
    pub fn from_entries(entries: Vec<ValidationError>) -> Self {
        let mut field_errors: BTreeMap<String, Vec<ValidationError>> = BTreeMap::new();
        for entry in &entries {
            field_errors
                .entry(entry.field.clone())
                .or_default()
                .push(entry.clone());
        }

        let (errors, rest): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .partition(|e| e.severity == Severity::Error);
        let warnings = rest
            .into_iter()
            .filter(|e| e.severity == Severity::Warning)
            .collect();

        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            field_errors,
        }
    }

    /// Returns the entries reported for a field.
    pub fn errors_for(&self, field: &str) -> &[ValidationError] {
        self.field_errors
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the first message reported for a field.
    pub fn first_message(&self, field: &str) -> Option<&str> {
        self.errors_for(field).first().map(|e| e.message.as_str())
    }
}
