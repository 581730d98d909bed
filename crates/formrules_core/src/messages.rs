//! Message resolution.
//!
//! The evaluator never hardcodes message text. It hands a catalog key plus
//! interpolation arguments to a [`MessageResolver`], which is injected by the
//! host application.

use crate::SchemaError;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("valid placeholder regex")
});

/// Values available to message templates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageArgs {
    /// The rule parameter, rendered as text (`{{value}}`)
    pub value: Option<String>,

    /// The field's display label (`{{field}}`)
    pub field: String,
}

/// Turns message keys into user-facing text.
pub trait MessageResolver: Send + Sync {
    /// Resolves `key` with the given arguments.
    fn resolve(&self, key: &str, args: &MessageArgs) -> String;

    /// Returns the display label of a field.
    ///
    /// Default implementation returns the field name unchanged.
    fn field_label(&self, field: &str) -> String {
        field.to_string()
    }
}

/// Resolver that returns keys unchanged.
///
/// Behaves like a localization runtime with no resources loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyResolver;

impl MessageResolver for KeyResolver {
    fn resolve(&self, key: &str, _args: &MessageArgs) -> String {
        key.to_string()
    }
}

/// A flat table of message templates keyed by dotted names.
///
/// Templates interpolate `{{value}}` and `{{field}}`. Keys missing from the
/// catalog resolve to themselves, so a rule's literal message override is
/// passed through as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageCatalog {
    /// Language tag of this catalog (e.g. "en", "ar")
    #[serde(default)]
    pub locale: Option<String>,

    /// Templates keyed by dotted name (e.g. "validation.required")
    #[serde(default)]
    pub messages: HashMap<String, String>,
}

impl MessageCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the built-in English catalog.
    pub fn english() -> Self {
        let messages = [
            ("validation.required", "{{field}} is required"),
            ("validation.minLength", "{{field}} must be at least {{value}} characters"),
            ("validation.maxLength", "{{field}} must be at most {{value}} characters"),
            ("validation.min", "{{field}} must be at least {{value}}"),
            ("validation.max", "{{field}} must be at most {{value}}"),
            ("validation.pattern", "{{field}} has an invalid format"),
            ("validation.email", "{{field}} must be a valid email address"),
            ("validation.phone", "{{field}} must be a valid phone number"),
            ("validation.url", "{{field}} must be a valid URL"),
            ("validation.iban", "{{field}} must be a valid IBAN"),
            ("validation.taxNumber", "{{field}} must be a valid tax number"),
            (
                "validation.decimal",
                "{{field}} must be a number with at most {{value}} decimal places",
            ),
            ("validation.integer", "{{field}} must be a whole number"),
            ("validation.date", "{{field}} must be a valid date"),
            ("validation.future", "{{field}} must be in the future"),
            ("validation.past", "{{field}} must be in the past"),
            ("validation.unique", "{{field}} must be unique"),
            ("validation.invalid", "{{field}} is invalid"),
        ];

        Self {
            locale: Some("en".to_string()),
            messages: messages
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Builds a catalog from a nested resource tree.
    ///
    /// Nested objects are flattened into dotted keys, so
    /// `{"validation": {"required": "..."}}` defines `validation.required`.
    /// Numbers and booleans are stored as text; arrays and nulls are ignored.
    pub fn from_tree(locale: Option<String>, tree: serde_json::Value) -> crate::Result<Self> {
        let serde_json::Value::Object(root) = tree else {
            return Err(SchemaError::InvalidCatalog(
                "catalog root must be a mapping of keys to messages".to_string(),
            ));
        };

        let mut messages = HashMap::new();
        for (key, value) in root {
            flatten_into(&mut messages, key, value);
        }

        Ok(Self { locale, messages })
    }

    /// Adds or replaces a template.
    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.messages.insert(key.into(), template.into());
    }

    /// Returns the raw template for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    /// Returns the number of templates.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if the catalog has no templates.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl MessageResolver for MessageCatalog {
    fn resolve(&self, key: &str, args: &MessageArgs) -> String {
        match self.get(key) {
            Some(template) => interpolate(template, args),
            None => key.to_string(),
        }
    }

    fn field_label(&self, field: &str) -> String {
        self.get(&format!("fields.{field}"))
            .map(str::to_string)
            .unwrap_or_else(|| field.to_string())
    }
}

fn flatten_into(messages: &mut HashMap<String, String>, key: String, value: serde_json::Value) {
    use serde_json::Value;

    match value {
        Value::String(s) => {
            messages.insert(key, s);
        }
        Value::Number(n) => {
            messages.insert(key, n.to_string());
        }
        Value::Bool(b) => {
            messages.insert(key, b.to_string());
        }
        Value::Object(children) => {
            for (child, value) in children {
                flatten_into(messages, format!("{key}.{child}"), value);
            }
        }
        Value::Array(_) | Value::Null => {}
    }
}

/// Substitutes `{{value}}` and `{{field}}` (spaces inside braces allowed).
///
/// Unknown placeholders are left for the host to notice.
pub fn interpolate(template: &str, args: &MessageArgs) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "value" => args.value.clone().unwrap_or_default(),
            "field" => args.field.clone(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(value: Option<&str>, field: &str) -> MessageArgs {
        MessageArgs {
            value: value.map(str::to_string),
            field: field.to_string(),
        }
    }

    #[test]
    fn test_key_resolver_returns_key() {
        let resolved = KeyResolver.resolve("validation.required", &args(None, "name"));
        assert_eq!(resolved, "validation.required");
        assert_eq!(KeyResolver.field_label("name"), "name");
    }

    #[test]
    fn test_interpolate() {
        assert_eq!(
            interpolate("{{field}} needs {{ value }} chars", &args(Some("5"), "Name")),
            "Name needs 5 chars"
        );
        assert_eq!(interpolate("{{value}}!", &args(None, "x")), "!");
        assert_eq!(interpolate("keep {{other}}", &args(None, "x")), "keep {{other}}");
        assert_eq!(interpolate("open {{field", &args(None, "x")), "open {{field");
        assert_eq!(
            interpolate("{{field}} / {{field}} <= {{value}}", &args(Some("9"), "Qty")),
            "Qty / Qty <= 9"
        );
    }

    #[test]
    fn test_english_catalog_covers_every_kind() {
        let catalog = MessageCatalog::english();
        for kind in crate::RuleKind::ALL {
            assert!(
                catalog.get(kind.default_message_key()).is_some(),
                "missing message for {kind}"
            );
        }
    }

    #[test]
    fn test_catalog_missing_key_falls_back() {
        let catalog = MessageCatalog::english();
        assert_eq!(
            catalog.resolve("Please pick a supplier", &args(None, "supplier")),
            "Please pick a supplier"
        );
    }

    #[test]
    fn test_catalog_field_labels() {
        let mut catalog = MessageCatalog::english();
        catalog.insert("fields.due_date", "Due date");

        assert_eq!(catalog.field_label("due_date"), "Due date");
        assert_eq!(catalog.field_label("notes"), "notes");
    }

    #[test]
    fn test_from_tree_flattens() {
        let tree = serde_json::json!({
            "validation": {
                "required": "{{field}} est obligatoire",
                "limits": { "max": 10 }
            },
            "fields": { "email": "Courriel" },
            "ignored": [1, 2]
        });

        let catalog = MessageCatalog::from_tree(Some("fr".to_string()), tree).unwrap();
        assert_eq!(catalog.locale.as_deref(), Some("fr"));
        assert_eq!(catalog.get("validation.required"), Some("{{field}} est obligatoire"));
        assert_eq!(catalog.get("validation.limits.max"), Some("10"));
        assert_eq!(catalog.field_label("email"), "Courriel");
        assert_eq!(catalog.get("ignored"), None);
    }

    #[test]
    fn test_from_tree_rejects_scalar_root() {
        let err = MessageCatalog::from_tree(None, serde_json::json!("nope")).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidCatalog(_)));
    }
}
