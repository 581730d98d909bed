//! Form completion summary.

use formrules_core::{EvaluationResult, Schema};
use serde::Serialize;

/// How many fields of a form currently validate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FormStatus {
    /// Fields declared by the schema
    pub total_fields: usize,

    /// Fields evaluated without errors
    pub valid_fields: usize,

    /// Total number of errors across the form
    pub error_count: usize,
}

impl FormStatus {
    pub fn new(total_fields: usize, valid_fields: usize, error_count: usize) -> Self {
        Self {
            total_fields,
            valid_fields,
            error_count,
        }
    }

    /// Summarizes a whole-form evaluation.
    pub fn from_result(schema: &Schema, result: &EvaluationResult) -> Self {
        let valid_fields = schema
            .field_names()
            .filter(|name| result.errors_for(name).is_empty())
            .count();

        Self::new(schema.len(), valid_fields, result.errors.len())
    }

    /// Percentage of valid fields, rounded. Zero for a form with no fields.
    pub fn percentage(&self) -> u8 {
        if self.total_fields == 0 {
            return 0;
        }

        (self.valid_fields as f64 / self.total_fields as f64 * 100.0).round() as u8
    }

    /// Returns true if every field validates.
    pub fn is_complete(&self) -> bool {
        self.total_fields > 0 && self.valid_fields == self.total_fields
    }
}
