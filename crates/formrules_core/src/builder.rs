//! Builder pattern for creating schemas.
//!
//! This module provides ergonomic builders for constructing schemas and
//! their fields with a fluent API.

use crate::{FieldSpec, Rule, Schema};

/// Builder for creating a `Schema`.
///
/// # Example
///
/// ```rust
/// use formrules_core::{FieldBuilder, Rule, SchemaBuilder};
///
/// let schema = SchemaBuilder::new()
///     .field(FieldBuilder::new("email").rule(Rule::required()).rule(Rule::email()).build())
///     .field(FieldBuilder::new("phone").rule(Rule::phone()).build())
///     .build()
///     .expect("field names are unique");
///
/// assert_eq!(schema.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Creates an empty schema builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field to the schema.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds multiple fields to the schema.
    pub fn fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Builds the schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::DuplicateField` if two fields share a name.
    pub fn build(self) -> crate::Result<Schema> {
        Schema::from_fields(self.fields)
    }
}

/// Builder for creating a `FieldSpec`.
///
/// # Example
///
/// ```rust
/// use formrules_core::{FieldBuilder, Rule, RuleKind};
///
/// let field = FieldBuilder::new("iban")
///     .label("Bank account (IBAN)")
///     .rule(Rule::required())
///     .rule(Rule::iban())
///     .build();
///
/// assert!(field.has_rule(RuleKind::Iban));
/// ```
#[derive(Debug)]
pub struct FieldBuilder {
    field: FieldSpec,
}

impl FieldBuilder {
    /// Creates a new field builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            field: FieldSpec::new(name),
        }
    }

    /// Sets the display label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.field.label = Some(label.into());
        self
    }

    /// Appends a rule.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.field.rules.push(rule);
        self
    }

    /// Appends several rules.
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.field.rules.extend(rules);
        self
    }

    /// Declares a sibling field this field's rules read.
    pub fn depends_on(mut self, field: impl Into<String>) -> Self {
        self.field.depends_on.push(field.into());
        self
    }

    /// Builds the field.
    pub fn build(self) -> FieldSpec {
        self.field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RuleKind, SchemaError};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_builder() {
        let field = FieldBuilder::new("confirm_password")
            .label("Confirm password")
            .rules([Rule::required(), Rule::min_length(8)])
            .depends_on("password")
            .build();

        assert_eq!(field.name, "confirm_password");
        assert_eq!(field.label.as_deref(), Some("Confirm password"));
        assert_eq!(
            field.rules.iter().map(Rule::kind).collect::<Vec<_>>(),
            vec![RuleKind::Required, RuleKind::MinLength]
        );
        assert_eq!(field.depends_on, vec!["password".to_string()]);
    }

    #[test]
    fn test_schema_builder_rejects_duplicates() {
        let err = SchemaBuilder::new()
            .field(FieldBuilder::new("sku").build())
            .fields(vec![FieldBuilder::new("sku").build()])
            .build()
            .unwrap_err();

        assert!(matches!(err, SchemaError::DuplicateField(_)));
    }

    #[test]
    fn test_empty_schema() {
        let schema = SchemaBuilder::new().build().unwrap();
        assert!(schema.is_empty());
        assert_eq!(schema.rule_count(), 0);
    }
}
