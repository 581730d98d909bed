//! Serializable schema definitions.
//!
//! Schemas written in YAML, TOML or JSON deserialize into [`SchemaDef`].
//! Binding a definition compiles its patterns and resolves `custom` rules
//! by name through a [`PredicateRegistry`].

use crate::{
    Check, DEFAULT_DECIMAL_PLACES, FieldSpec, FieldValue, FieldValues, Predicate, Rule, Schema,
    SchemaError, predicate_fn,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A schema as written in a definition file.
///
/// # Example
///
/// ```rust
/// use formrules_core::{PredicateRegistry, SchemaDef};
///
/// let def: SchemaDef = serde_json::from_str(r#"{
///     "name": "contact",
///     "fields": [
///         { "name": "email", "rules": [{ "type": "required" }, { "type": "email" }] },
///         { "name": "notes", "rules": [{ "type": "maxLength", "value": 500 }] }
///     ]
/// }"#).unwrap();
///
/// let schema = def.bind(&PredicateRegistry::new()).unwrap();
/// assert_eq!(schema.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDef {
    /// Form name
    #[serde(default)]
    pub name: Option<String>,

    /// Human-readable description of the form
    #[serde(default)]
    pub description: Option<String>,

    /// Field definitions
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// A field as written in a definition file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name
    pub name: String,

    /// Optional display label
    #[serde(default)]
    pub label: Option<String>,

    /// Ordered rules
    #[serde(default)]
    pub rules: Vec<RuleDef>,

    /// Sibling fields the rules read
    #[serde(default, alias = "dependsOn")]
    pub depends_on: Vec<String>,
}

/// A rule as written in a definition file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDef {
    /// The check and its parameter
    #[serde(flatten)]
    pub check: CheckDef,

    /// Optional message override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A check as written in a definition file, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CheckDef {
    Required,
    MinLength {
        value: usize,
    },
    MaxLength {
        value: usize,
    },
    Min {
        value: f64,
    },
    Max {
        value: f64,
    },
    Pattern {
        value: String,
    },
    Email,
    Phone,
    Url,
    Iban,
    TaxNumber {
        value: String,
    },
    Decimal {
        #[serde(default = "default_decimal_places")]
        value: u32,
    },
    Integer,
    Date,
    Future,
    Past,
    Unique,
    /// References a predicate registered under `name`
    Custom {
        name: String,
    },
}

fn default_decimal_places() -> u32 {
    DEFAULT_DECIMAL_PLACES
}

impl SchemaDef {
    /// Compiles the definition into a [`Schema`].
    ///
    /// # Errors
    ///
    /// Fails on duplicate field names, invalid patterns and custom rules
    /// naming an unregistered predicate.
    pub fn bind(&self, registry: &PredicateRegistry) -> crate::Result<Schema> {
        let fields = self
            .fields
            .iter()
            .map(|field| field.bind(registry))
            .collect::<crate::Result<Vec<_>>>()?;

        debug!(
            "Bound schema {} with {} fields",
            self.name.as_deref().unwrap_or("<unnamed>"),
            fields.len()
        );
        Schema::from_fields(fields)
    }
}

impl FieldDef {
    fn bind(&self, registry: &PredicateRegistry) -> crate::Result<FieldSpec> {
        let rules = self
            .rules
            .iter()
            .map(|rule| rule.bind(&self.name, registry))
            .collect::<crate::Result<Vec<_>>>()?;

        Ok(FieldSpec {
            name: self.name.clone(),
            label: self.label.clone(),
            rules,
            depends_on: self.depends_on.clone(),
        })
    }
}

impl RuleDef {
    fn bind(&self, field: &str, registry: &PredicateRegistry) -> crate::Result<Rule> {
        let check = match &self.check {
            CheckDef::Required => Check::Required,
            CheckDef::MinLength { value } => Check::MinLength(*value),
            CheckDef::MaxLength { value } => Check::MaxLength(*value),
            CheckDef::Min { value } => Check::Min(*value),
            CheckDef::Max { value } => Check::Max(*value),
            CheckDef::Pattern { value } => {
                Check::Pattern(Regex::new(value).map_err(|e| SchemaError::InvalidPattern {
                    pattern: value.clone(),
                    message: e.to_string(),
                })?)
            }
            CheckDef::Email => Check::Email,
            CheckDef::Phone => Check::Phone,
            CheckDef::Url => Check::Url,
            CheckDef::Iban => Check::Iban,
            CheckDef::TaxNumber { value } => Check::TaxNumber(value.clone()),
            CheckDef::Decimal { value } => Check::Decimal(*value),
            CheckDef::Integer => Check::Integer,
            CheckDef::Date => Check::Date,
            CheckDef::Future => Check::Future,
            CheckDef::Past => Check::Past,
            CheckDef::Unique => Check::Unique,
            CheckDef::Custom { name } => {
                let predicate =
                    registry
                        .get(name)
                        .ok_or_else(|| SchemaError::UnknownPredicate {
                            field: field.to_string(),
                            name: name.clone(),
                        })?;
                Check::Custom(predicate)
            }
        };

        Ok(Rule {
            check,
            message: self.message.clone(),
        })
    }
}

/// Named custom predicates available to definition files.
#[derive(Clone, Default)]
pub struct PredicateRegistry {
    predicates: HashMap<String, Arc<dyn Predicate>>,
}

impl PredicateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a predicate under a name, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, predicate: Arc<dyn Predicate>) {
        self.predicates.insert(name.into(), predicate);
    }

    /// Registers a synchronous closure under a name.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&FieldValue, &FieldValues) -> bool + Send + Sync + 'static,
    {
        self.register(name, predicate_fn(f));
    }

    /// Looks up a predicate by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Predicate>> {
        self.predicates.get(name).cloned()
    }

    /// Returns true if a predicate is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.predicates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for PredicateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredicateRegistry")
            .field("predicates", &self.names())
            .finish()
    }
}
