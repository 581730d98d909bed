//! Validation rules.
//!
//! A [`Rule`] pairs one [`Check`] with an optional message override. Checks
//! carry their parameter in a typed form, so a `minLength` always has a
//! length and a `pattern` always has a compiled regular expression.

use crate::value::format_number;
use crate::{FieldValue, FieldValues, SchemaError};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Decimal places accepted by a `decimal` rule when none are given.
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Identifies which check a rule performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    Min,
    Max,
    Pattern,
    Email,
    Phone,
    Url,
    Iban,
    TaxNumber,
    Decimal,
    Integer,
    Date,
    Future,
    Past,
    Unique,
    Custom,
}

impl RuleKind {
    /// Every rule kind, in declaration order.
    pub const ALL: [RuleKind; 18] = [
        RuleKind::Required,
        RuleKind::MinLength,
        RuleKind::MaxLength,
        RuleKind::Min,
        RuleKind::Max,
        RuleKind::Pattern,
        RuleKind::Email,
        RuleKind::Phone,
        RuleKind::Url,
        RuleKind::Iban,
        RuleKind::TaxNumber,
        RuleKind::Decimal,
        RuleKind::Integer,
        RuleKind::Date,
        RuleKind::Future,
        RuleKind::Past,
        RuleKind::Unique,
        RuleKind::Custom,
    ];

    /// Returns the camelCase name of this kind (e.g. `"minLength"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::MinLength => "minLength",
            RuleKind::MaxLength => "maxLength",
            RuleKind::Min => "min",
            RuleKind::Max => "max",
            RuleKind::Pattern => "pattern",
            RuleKind::Email => "email",
            RuleKind::Phone => "phone",
            RuleKind::Url => "url",
            RuleKind::Iban => "iban",
            RuleKind::TaxNumber => "taxNumber",
            RuleKind::Decimal => "decimal",
            RuleKind::Integer => "integer",
            RuleKind::Date => "date",
            RuleKind::Future => "future",
            RuleKind::Past => "past",
            RuleKind::Unique => "unique",
            RuleKind::Custom => "custom",
        }
    }

    /// Returns the message catalog key used when a rule has no override.
    pub fn default_message_key(&self) -> &'static str {
        match self {
            RuleKind::Required => "validation.required",
            RuleKind::MinLength => "validation.minLength",
            RuleKind::MaxLength => "validation.maxLength",
            RuleKind::Min => "validation.min",
            RuleKind::Max => "validation.max",
            RuleKind::Pattern => "validation.pattern",
            RuleKind::Email => "validation.email",
            RuleKind::Phone => "validation.phone",
            RuleKind::Url => "validation.url",
            RuleKind::Iban => "validation.iban",
            RuleKind::TaxNumber => "validation.taxNumber",
            RuleKind::Decimal => "validation.decimal",
            RuleKind::Integer => "validation.integer",
            RuleKind::Date => "validation.date",
            RuleKind::Future => "validation.future",
            RuleKind::Past => "validation.past",
            RuleKind::Unique => "validation.unique",
            RuleKind::Custom => "validation.invalid",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownRuleKind(s.to_string()))
    }
}

/// A host-supplied check that may consult sibling field values.
///
/// Predicates may suspend (e.g. to ask a server whether a code is taken).
/// Returning `Err` is treated as a failed rule, never as a crash of the form.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use formrules_core::{FieldValue, FieldValues, Predicate};
///
/// struct MatchesPassword;
///
/// #[async_trait]
/// impl Predicate for MatchesPassword {
///     async fn test(&self, value: &FieldValue, values: &FieldValues) -> anyhow::Result<bool> {
///         Ok(values.get("password") == Some(value))
///     }
/// }
/// ```
#[async_trait]
pub trait Predicate: Send + Sync {
    /// Returns whether `value` is acceptable given every field in `values`.
    async fn test(&self, value: &FieldValue, values: &FieldValues) -> anyhow::Result<bool>;
}

/// Adapts a synchronous closure into a [`Predicate`].
pub struct FnPredicate<F>(F);

#[async_trait]
impl<F> Predicate for FnPredicate<F>
where
    F: Fn(&FieldValue, &FieldValues) -> anyhow::Result<bool> + Send + Sync,
{
    async fn test(&self, value: &FieldValue, values: &FieldValues) -> anyhow::Result<bool> {
        (self.0)(value, values)
    }
}

/// Wraps an infallible closure as a shareable predicate.
pub fn predicate_fn<F>(f: F) -> Arc<dyn Predicate>
where
    F: Fn(&FieldValue, &FieldValues) -> bool + Send + Sync + 'static,
{
    Arc::new(FnPredicate(
        move |value: &FieldValue, values: &FieldValues| -> anyhow::Result<bool> {
            Ok(f(value, values))
        },
    ))
}

/// Wraps a fallible closure as a shareable predicate.
pub fn try_predicate_fn<F>(f: F) -> Arc<dyn Predicate>
where
    F: Fn(&FieldValue, &FieldValues) -> anyhow::Result<bool> + Send + Sync + 'static,
{
    Arc::new(FnPredicate(f))
}

/// The check a rule performs, with its typed parameter.
#[derive(Clone)]
pub enum Check {
    Required,
    /// Minimum character count
    MinLength(usize),
    /// Maximum character count
    MaxLength(usize),
    /// Inclusive numeric lower bound
    Min(f64),
    /// Inclusive numeric upper bound
    Max(f64),
    /// Regular expression searched anywhere in the value
    Pattern(Regex),
    Email,
    Phone,
    Url,
    Iban,
    /// Country code selecting the tax number format
    TaxNumber(String),
    /// Maximum number of decimal places
    Decimal(u32),
    Integer,
    Date,
    Future,
    Past,
    /// Reserved: there is no built-in uniqueness check
    Unique,
    /// Host-supplied predicate
    Custom(Arc<dyn Predicate>),
}

impl Check {
    /// Returns the kind of this check.
    pub fn kind(&self) -> RuleKind {
        match self {
            Check::Required => RuleKind::Required,
            Check::MinLength(_) => RuleKind::MinLength,
            Check::MaxLength(_) => RuleKind::MaxLength,
            Check::Min(_) => RuleKind::Min,
            Check::Max(_) => RuleKind::Max,
            Check::Pattern(_) => RuleKind::Pattern,
            Check::Email => RuleKind::Email,
            Check::Phone => RuleKind::Phone,
            Check::Url => RuleKind::Url,
            Check::Iban => RuleKind::Iban,
            Check::TaxNumber(_) => RuleKind::TaxNumber,
            Check::Decimal(_) => RuleKind::Decimal,
            Check::Integer => RuleKind::Integer,
            Check::Date => RuleKind::Date,
            Check::Future => RuleKind::Future,
            Check::Past => RuleKind::Past,
            Check::Unique => RuleKind::Unique,
            Check::Custom(_) => RuleKind::Custom,
        }
    }

    /// Returns the parameter rendered for message interpolation.
    pub fn parameter(&self) -> Option<String> {
        match self {
            Check::MinLength(n) | Check::MaxLength(n) => Some(n.to_string()),
            Check::Min(bound) | Check::Max(bound) => Some(format_number(*bound)),
            Check::Pattern(regex) => Some(regex.as_str().to_string()),
            Check::TaxNumber(country) => Some(country.clone()),
            Check::Decimal(places) => Some(places.to_string()),
            _ => None,
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Custom(_) => f.write_str("Custom(<predicate>)"),
            other => match other.parameter() {
                Some(param) => write!(f, "{:?}({})", other.kind(), param),
                None => write!(f, "{:?}", other.kind()),
            },
        }
    }
}

/// One check applied to a field, with an optional message override.
#[derive(Debug, Clone)]
pub struct Rule {
    /// The check to perform
    pub check: Check,

    /// Message key or literal used instead of the kind's default key
    pub message: Option<String>,
}

impl Rule {
    /// Creates a rule without a message override.
    pub fn new(check: Check) -> Self {
        Self {
            check,
            message: None,
        }
    }

    /// Sets the message override.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the kind of this rule.
    pub fn kind(&self) -> RuleKind {
        self.check.kind()
    }

    pub fn required() -> Self {
        Self::new(Check::Required)
    }

    pub fn min_length(min: usize) -> Self {
        Self::new(Check::MinLength(min))
    }

    pub fn max_length(max: usize) -> Self {
        Self::new(Check::MaxLength(max))
    }

    pub fn min(min: f64) -> Self {
        Self::new(Check::Min(min))
    }

    pub fn max(max: f64) -> Self {
        Self::new(Check::Max(max))
    }

    /// Creates a `pattern` rule, compiling the expression.
    pub fn pattern(pattern: &str) -> crate::Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(Check::Pattern(regex)))
    }

    pub fn email() -> Self {
        Self::new(Check::Email)
    }

    pub fn phone() -> Self {
        Self::new(Check::Phone)
    }

    pub fn url() -> Self {
        Self::new(Check::Url)
    }

    pub fn iban() -> Self {
        Self::new(Check::Iban)
    }

    pub fn tax_number(country: impl Into<String>) -> Self {
        Self::new(Check::TaxNumber(country.into()))
    }

    pub fn decimal(places: u32) -> Self {
        Self::new(Check::Decimal(places))
    }

    pub fn integer() -> Self {
        Self::new(Check::Integer)
    }

    pub fn date() -> Self {
        Self::new(Check::Date)
    }

    pub fn future() -> Self {
        Self::new(Check::Future)
    }

    pub fn past() -> Self {
        Self::new(Check::Past)
    }

    pub fn unique() -> Self {
        Self::new(Check::Unique)
    }

    /// Creates a `custom` rule from a shared predicate.
    pub fn custom(predicate: Arc<dyn Predicate>) -> Self {
        Self::new(Check::Custom(predicate))
    }

    /// Creates a `custom` rule from a synchronous closure.
    pub fn custom_fn<F>(f: F) -> Self
    where
        F: Fn(&FieldValue, &FieldValues) -> bool + Send + Sync + 'static,
    {
        Self::custom(predicate_fn(f))
    }
}
