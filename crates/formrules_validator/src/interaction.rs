//! Interaction-state tracking for live forms.
//!
//! Errors are computed eagerly but shown lazily: a field's error becomes
//! visible once the user has left that field (blur) or once the whole form
//! has been validated, typically on submit.

use crate::{FormStatus, RuleEvaluator};
use formrules_core::{EvaluationResult, FieldValue, FieldValues, Schema, ValidationError};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Which fields the user has visited and what errors were last computed.
///
/// Transitions are pure: each returns a new state and leaves `self` as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    touched: BTreeSet<String>,
    reveal_all: bool,
    errors: BTreeMap<String, Vec<ValidationError>>,
    evaluated: BTreeSet<String>,
}

impl InteractionState {
    /// Creates the initial state: nothing touched, nothing revealed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `field` touched and stores its freshly computed errors.
    pub fn with_blur(&self, field: &str, errors: Vec<ValidationError>) -> Self {
        let mut next = self.clone();
        next.touched.insert(field.to_string());
        next.evaluated.insert(field.to_string());
        next.errors.insert(field.to_string(), errors);
        next
    }

    /// Stores errors computed on a value change.
    ///
    /// Returns `None` when the field is not revealed: no evaluation should
    /// happen for it yet.
    pub fn with_change(&self, field: &str, errors: Vec<ValidationError>) -> Option<Self> {
        if !self.is_revealed(field) {
            return None;
        }

        let mut next = self.clone();
        next.evaluated.insert(field.to_string());
        next.errors.insert(field.to_string(), errors);
        Some(next)
    }

    /// Replaces the cache with a whole-form result and reveals every field.
    ///
    /// The cache holds only failing fields; every schema field counts as
    /// evaluated.
    pub fn with_validate_all(&self, schema: &Schema, result: &EvaluationResult) -> Self {
        Self {
            touched: self.touched.clone(),
            reveal_all: true,
            errors: result.field_errors.clone(),
            evaluated: schema.field_names().map(str::to_string).collect(),
        }
    }

    /// Sets whether every field's errors are shown regardless of touch.
    pub fn with_reveal_all(&self, reveal_all: bool) -> Self {
        Self {
            reveal_all,
            ..self.clone()
        }
    }

    /// Returns the initial state.
    pub fn cleared(&self) -> Self {
        Self::new()
    }

    /// Returns true if errors for `field` may be shown.
    pub fn is_revealed(&self, field: &str) -> bool {
        self.reveal_all || self.touched.contains(field)
    }

    /// Returns the first cached message for `field`, if revealed.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        if !self.is_revealed(field) {
            return None;
        }

        self.errors
            .get(field)
            .and_then(|errors| errors.first())
            .map(|e| e.message.as_str())
    }

    /// Returns true if `field` has a revealed error.
    pub fn has_error(&self, field: &str) -> bool {
        self.field_error(field).is_some()
    }

    /// Returns the touched fields.
    pub fn touched(&self) -> &BTreeSet<String> {
        &self.touched
    }

    /// Returns the cached errors by field, revealed or not.
    pub fn errors(&self) -> &BTreeMap<String, Vec<ValidationError>> {
        &self.errors
    }

    /// Returns true once the whole form has been revealed.
    pub fn reveal_all(&self) -> bool {
        self.reveal_all
    }

    /// Returns the fields with a computed result since the last clear.
    pub fn evaluated(&self) -> &BTreeSet<String> {
        &self.evaluated
    }

    /// Returns true if `field` was evaluated and has no cached errors.
    pub fn is_valid(&self, field: &str) -> bool {
        self.evaluated.contains(field) && self.errors.get(field).is_none_or(Vec::is_empty)
    }
}

/// A schema bound to an evaluator and the live interaction state of one form.
///
/// # Example
///
/// ```rust
/// use formrules_core::{FieldBuilder, Rule, SchemaBuilder, field_values};
/// use formrules_validator::FormValidator;
///
/// # #[tokio::main]
/// # async fn main() {
/// let schema = SchemaBuilder::new()
///     .field(FieldBuilder::new("email").rule(Rule::required()).build())
///     .build()
///     .unwrap();
/// let mut form = FormValidator::new(schema);
///
/// let values = field_values([("email", "")]);
/// form.on_change("email", &"".into(), &values).await;
/// assert_eq!(form.field_error("email"), None);
///
/// form.on_blur("email", &"".into(), &values).await;
/// assert_eq!(form.field_error("email"), Some("validation.required"));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FormValidator {
    schema: Schema,
    evaluator: RuleEvaluator,
    state: InteractionState,
}

impl FormValidator {
    /// Creates a form validator reporting plain message keys.
    pub fn new(schema: Schema) -> Self {
        Self::with_evaluator(schema, RuleEvaluator::new())
    }

    /// Creates a form validator with a configured evaluator.
    pub fn with_evaluator(schema: Schema, evaluator: RuleEvaluator) -> Self {
        Self {
            schema,
            evaluator,
            state: InteractionState::new(),
        }
    }

    /// Marks the field touched, evaluates it and caches the result.
    pub async fn on_blur(&mut self, field: &str, value: &FieldValue, values: &FieldValues) {
        let errors = self
            .evaluator
            .evaluate_field(&self.schema, field, value, values)
            .await;
        debug!("Blur on '{}': {} errors", field, errors.len());
        self.state = self.state.with_blur(field, errors);
    }

    /// Re-evaluates the field if its errors are already revealed.
    pub async fn on_change(&mut self, field: &str, value: &FieldValue, values: &FieldValues) {
        if !self.state.is_revealed(field) {
            return;
        }

        let errors = self
            .evaluator
            .evaluate_field(&self.schema, field, value, values)
            .await;
        if let Some(next) = self.state.with_change(field, errors) {
            self.state = next;
        }
    }

    /// Evaluates the whole form, caches every field and reveals all errors.
    pub async fn validate_all(&mut self, values: &FieldValues) -> EvaluationResult {
        let result = self.evaluator.evaluate_all(&self.schema, values).await;
        self.state = self.state.with_validate_all(&self.schema, &result);
        result
    }

    /// Resets to the initial state.
    pub fn clear(&mut self) {
        self.state = self.state.cleared();
    }

    /// Shows or hides every field's errors regardless of touch.
    pub fn set_reveal_all(&mut self, reveal_all: bool) {
        self.state = self.state.with_reveal_all(reveal_all);
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.state.field_error(field)
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.state.has_error(field)
    }

    pub fn errors(&self) -> &BTreeMap<String, Vec<ValidationError>> {
        self.state.errors()
    }

    pub fn touched(&self) -> &BTreeSet<String> {
        self.state.touched()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Summarizes how much of the form currently validates.
    ///
    /// A field never evaluated is not yet valid.
    pub fn status(&self) -> FormStatus {
        let valid_fields = self
            .schema
            .field_names()
            .filter(|name| self.state.is_valid(name))
            .count();
        let error_count = self.state.errors().values().map(Vec::len).sum();

        FormStatus::new(self.schema.len(), valid_fields, error_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formrules_core::{FieldBuilder, Rule, RuleKind, SchemaBuilder, field_values};
    use pretty_assertions::assert_eq;

    fn error(field: &str) -> ValidationError {
        ValidationError::new(field, RuleKind::Required, "validation.required")
    }

    #[test]
    fn test_initial_state_hides_everything() {
        let state = InteractionState::new();
        assert!(state.touched().is_empty());
        assert!(!state.reveal_all());
        assert!(!state.is_revealed("email"));
        assert_eq!(state.field_error("email"), None);
    }

    #[test]
    fn test_blur_is_idempotent_and_pure() {
        let initial = InteractionState::new();
        let once = initial.with_blur("email", vec![error("email")]);
        let twice = once.with_blur("email", vec![error("email")]);

        assert_eq!(once, twice);
        assert_eq!(initial, InteractionState::new());
        assert_eq!(twice.touched().len(), 1);
    }

    #[test]
    fn test_change_on_untouched_field_is_ignored() {
        let state = InteractionState::new();
        assert_eq!(state.with_change("email", vec![error("email")]), None);

        let revealed = state.with_reveal_all(true);
        let next = revealed.with_change("email", vec![error("email")]).unwrap();
        assert!(next.has_error("email"));
    }

    #[test]
    fn test_errors_gated_by_reveal() {
        let schema = Schema::from_fields([
            formrules_core::FieldSpec::new("name"),
            formrules_core::FieldSpec::new("email"),
        ])
        .unwrap();
        let result = EvaluationResult::from_entries(vec![error("email")]);
        let state = InteractionState::new()
            .with_validate_all(&schema, &result)
            .with_reveal_all(false);

        assert_eq!(state.errors().len(), 1);
        assert!(!state.errors().contains_key("name"));
        assert_eq!(state.evaluated().len(), 2);
        assert!(state.is_valid("name"));
        assert!(!state.is_valid("email"));
        assert!(!state.has_error("email"));
        assert!(state.with_reveal_all(true).has_error("email"));
    }

    #[test]
    fn test_cleared() {
        let state = InteractionState::new()
            .with_blur("email", vec![error("email")])
            .with_reveal_all(true);
        assert_eq!(state.cleared(), InteractionState::new());
    }

    fn contact_schema() -> Schema {
        SchemaBuilder::new()
            .field(FieldBuilder::new("name").rule(Rule::required()).build())
            .field(
                FieldBuilder::new("email")
                    .rule(Rule::required())
                    .rule(Rule::email())
                    .build(),
            )
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_on_change_after_blur_updates_cache() {
        let mut form = FormValidator::new(contact_schema());

        form.on_blur("email", &"x".into(), &field_values([("email", "x")]))
            .await;
        assert_eq!(form.field_error("email"), Some("validation.email"));

        form.on_change(
            "email",
            &"a@b.co".into(),
            &field_values([("email", "a@b.co")]),
        )
        .await;
        assert_eq!(form.field_error("email"), None);
        assert!(form.errors()["email"].is_empty());
    }

    #[tokio::test]
    async fn test_on_change_untouched_computes_nothing() {
        let mut form = FormValidator::new(contact_schema());
        form.on_change("email", &"x".into(), &field_values([("email", "x")]))
            .await;

        assert!(form.errors().is_empty());
        assert!(form.touched().is_empty());
    }

    #[tokio::test]
    async fn test_validate_all_reveals_and_status() {
        let mut form = FormValidator::new(contact_schema());
        assert_eq!(form.status().percentage(), 0);

        let values = field_values([("name", "Acme")]);
        let result = form.validate_all(&values).await;

        assert!(!result.is_valid);
        assert!(form.state().reveal_all());
        assert!(form.has_error("email"));
        assert!(!form.has_error("name"));

        assert_eq!(form.errors().keys().collect::<Vec<_>>(), vec!["email"]);
        let status = form.status();
        assert_eq!(status.total_fields, 2);
        assert_eq!(status.valid_fields, 1);
        assert_eq!(status.error_count, 1);
        assert_eq!(status.percentage(), 50);

        form.clear();
        assert!(!form.has_error("email"));
        assert!(form.errors().is_empty());
        assert_eq!(form.status().valid_fields, 0);
    }
}
