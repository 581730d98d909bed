//! Main rule evaluation engine.
//!
//! This module provides the `RuleEvaluator` that runs a field's rules in
//! order, collects every failure and resolves messages through the injected
//! `MessageResolver`.

use crate::checks::builtin_passes;
use chrono::Utc;
use formrules_core::{
    Check, EvaluationResult, FieldSpec, FieldValue, FieldValues, KeyResolver, MessageArgs,
    MessageResolver, Predicate, Rule, Schema, ValidationError,
};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

static NULL_VALUE: FieldValue = FieldValue::Null;

/// Evaluates form values against a schema.
///
/// Validation failures are returned as data, never as `Err`. A custom
/// predicate that errors or panics becomes a `custom` failure and the
/// remaining rules still run.
///
/// # Example
///
/// ```rust
/// use formrules_core::{FieldBuilder, Rule, SchemaBuilder, field_values};
/// use formrules_validator::RuleEvaluator;
///
/// # #[tokio::main]
/// # async fn main() {
/// let schema = SchemaBuilder::new()
///     .field(FieldBuilder::new("email").rule(Rule::required()).rule(Rule::email()).build())
///     .build()
///     .unwrap();
///
/// let evaluator = RuleEvaluator::new();
/// let result = evaluator
///     .evaluate_all(&schema, &field_values([("email", "not-an-email")]))
///     .await;
///
/// assert!(!result.is_valid);
/// assert_eq!(result.first_message("email"), Some("validation.email"));
/// # }
/// ```
#[derive(Clone)]
pub struct RuleEvaluator {
    resolver: Arc<dyn MessageResolver>,
}

impl RuleEvaluator {
    /// Creates an evaluator that reports plain message keys.
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(KeyResolver))
    }

    /// Creates an evaluator that resolves messages through `resolver`.
    pub fn with_resolver(resolver: Arc<dyn MessageResolver>) -> Self {
        Self { resolver }
    }

    /// Returns the message resolver.
    pub fn resolver(&self) -> &Arc<dyn MessageResolver> {
        &self.resolver
    }

    /// Runs every rule of one field.
    ///
    /// Returns one entry per failed rule, in rule order. A field name the
    /// schema does not declare yields no entries.
    pub async fn evaluate_field(
        &self,
        schema: &Schema,
        field: &str,
        value: &FieldValue,
        values: &FieldValues,
    ) -> Vec<ValidationError> {
        let Some(spec) = schema.field(field) else {
            debug!("Field '{}' is not in the schema, skipping", field);
            return Vec::new();
        };

        self.evaluate_spec(spec, value, values).await
    }

    /// Runs every rule of every field and aggregates the outcome.
    ///
    /// Fields absent from `values` are evaluated as null.
    pub async fn evaluate_all(&self, schema: &Schema, values: &FieldValues) -> EvaluationResult {
        let start = Instant::now();
        let mut entries = Vec::new();

        for spec in schema.fields() {
            let value = values.get(&spec.name).unwrap_or(&NULL_VALUE);
            entries.extend(self.evaluate_spec(spec, value, values).await);
        }

        let result = EvaluationResult::from_entries(entries);
        debug!(
            "Evaluated {} fields in {}ms: {} errors",
            schema.len(),
            start.elapsed().as_millis(),
            result.errors.len()
        );
        result
    }

    async fn evaluate_spec(
        &self,
        spec: &FieldSpec,
        value: &FieldValue,
        values: &FieldValues,
    ) -> Vec<ValidationError> {
        let label = spec
            .label
            .clone()
            .unwrap_or_else(|| self.resolver.field_label(&spec.name));
        let now = Utc::now();
        let mut errors = Vec::new();

        for rule in &spec.rules {
            let outcome = match &rule.check {
                Check::Custom(predicate) => run_predicate(predicate, value, values).await,
                check => {
                    if matches!(check, Check::Unique) {
                        debug!("Field '{}': 'unique' has no built-in check", spec.name);
                    }
                    Outcome::from(builtin_passes(check, value, now).unwrap_or(true))
                }
            };

            match outcome {
                Outcome::Passed => {}
                Outcome::Failed => {
                    debug!("Field '{}' failed rule '{}'", spec.name, rule.kind());
                    errors.push(self.failure(spec, rule, &label, false));
                }
                Outcome::Faulted(reason) => {
                    warn!(
                        "Custom rule on field '{}' could not run: {}",
                        spec.name, reason
                    );
                    errors.push(self.failure(spec, rule, &label, true));
                }
            }
        }

        errors
    }

    fn failure(
        &self,
        spec: &FieldSpec,
        rule: &Rule,
        label: &str,
        faulted: bool,
    ) -> ValidationError {
        let key = match (&rule.message, faulted) {
            (Some(message), false) => message.as_str(),
            _ => rule.kind().default_message_key(),
        };
        let args = MessageArgs {
            value: rule.check.parameter(),
            field: label.to_string(),
        };

        ValidationError::new(&spec.name, rule.kind(), self.resolver.resolve(key, &args))
    }
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEvaluator").finish_non_exhaustive()
    }
}

enum Outcome {
    Passed,
    Failed,
    Faulted(String),
}

impl From<bool> for Outcome {
    fn from(passed: bool) -> Self {
        if passed { Outcome::Passed } else { Outcome::Failed }
    }
}

async fn run_predicate(
    predicate: &Arc<dyn Predicate>,
    value: &FieldValue,
    values: &FieldValues,
) -> Outcome {
    match AssertUnwindSafe(predicate.test(value, values))
        .catch_unwind()
        .await
    {
        Ok(Ok(passed)) => Outcome::from(passed),
        Ok(Err(e)) => Outcome::Faulted(format!("{e:#}")),
        Err(panic) => Outcome::Faulted(panic_message(panic.as_ref())),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
