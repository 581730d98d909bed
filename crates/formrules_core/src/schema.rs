//! Form schemas.
//!
//! A [`Schema`] is static configuration: it is built once when a form is
//! defined and handed to the evaluator on every call.

use crate::{Rule, RuleKind, SchemaError};
use std::collections::HashSet;
use std::fmt;

/// The validation contract of one named field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Field name, unique within its schema
    pub name: String,

    /// Display label used in messages; falls back to the resolver's label
    pub label: Option<String>,

    /// Rules, evaluated in this order
    pub rules: Vec<Rule>,

    /// Sibling fields this field's rules read (informational)
    pub depends_on: Vec<String>,
}

impl FieldSpec {
    /// Creates a field with no rules.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            rules: Vec::new(),
            depends_on: Vec::new(),
        }
    }

    /// Returns true if any rule has the given kind.
    pub fn has_rule(&self, kind: RuleKind) -> bool {
        self.rules.iter().any(|rule| rule.kind() == kind)
    }
}

/// The complete set of field specs for a form.
///
/// Fields keep their declaration order for reporting; order never changes
/// a verdict.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schema from fields, rejecting duplicate names.
    pub fn from_fields(fields: impl IntoIterator<Item = FieldSpec>) -> crate::Result<Self> {
        let mut schema = Self::new();
        for field in fields {
            schema.insert(field)?;
        }
        Ok(schema)
    }

    /// Adds a field.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::DuplicateField` if the name is already taken.
    pub fn insert(&mut self, field: FieldSpec) -> crate::Result<()> {
        if self.field(&field.name).is_some() {
            return Err(SchemaError::DuplicateField(field.name));
        }
        self.fields.push(field);
        Ok(())
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Returns an iterator over field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the total number of rules across all fields.
    pub fn rule_count(&self) -> usize {
        self.fields.iter().map(|f| f.rules.len()).sum()
    }

    /// Reviews the schema definition for likely authoring mistakes.
    ///
    /// Never fails: an empty list means nothing looked suspicious.
    pub fn check_definition(&self) -> Vec<DefinitionFinding> {
        let names: HashSet<&str> = self.field_names().collect();
        let mut findings = Vec::new();

        for field in &self.fields {
            if field.rules.is_empty() {
                findings.push(DefinitionFinding::NoRules {
                    field: field.name.clone(),
                });
            }

            if field.has_rule(RuleKind::Unique) && !field.has_rule(RuleKind::Custom) {
                findings.push(DefinitionFinding::ReservedRule {
                    field: field.name.clone(),
                    kind: RuleKind::Unique,
                });
            }

            for dependency in &field.depends_on {
                if !names.contains(dependency.as_str()) {
                    findings.push(DefinitionFinding::UnknownDependency {
                        field: field.name.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        findings
    }
}

/// A suspicious, but interpretable, part of a schema definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionFinding {
    /// Field declares no rules at all
    NoRules { field: String },

    /// Rule kind with no built-in check and no custom companion
    ReservedRule { field: String, kind: RuleKind },

    /// `depends_on` names a field that is not in the schema
    UnknownDependency { field: String, dependency: String },
}

impl fmt::Display for DefinitionFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionFinding::NoRules { field } => {
                write!(f, "Field '{field}' has no rules")
            }
            DefinitionFinding::ReservedRule { field, kind } => write!(
                f,
                "Field '{field}' uses '{kind}', which has no built-in check; add a custom rule"
            ),
            DefinitionFinding::UnknownDependency { field, dependency } => write!(
                f,
                "Field '{field}' depends on '{dependency}', which is not in the schema"
            ),
        }
    }
}
