//! Ready-made field definitions for common business inputs.
//!
//! Each preset returns a [`FieldBuilder`], so callers can still add a label,
//! extra rules or dependencies before building.
//!
//! ```rust
//! use formrules_core::SchemaBuilder;
//! use formrules_validator::presets;
//!
//! let schema = SchemaBuilder::new()
//!     .field(presets::email("contact_email").label("Email").build())
//!     .field(presets::amount("total", 0.0, Some(1_000_000.0)).build())
//!     .field(presets::tax_number("vat_number", "SA").build())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.len(), 3);
//! ```

use formrules_core::{FieldBuilder, Rule};

/// Longest text accepted by the text presets unless told otherwise.
pub const DEFAULT_MAX_TEXT: usize = 255;

/// Required, well-formed email of at most 255 characters.
pub fn email(name: impl Into<String>) -> FieldBuilder {
    FieldBuilder::new(name).rules([
        Rule::required(),
        Rule::email(),
        Rule::max_length(DEFAULT_MAX_TEXT),
    ])
}

/// Optional phone number of at most 20 characters.
pub fn phone(name: impl Into<String>) -> FieldBuilder {
    FieldBuilder::new(name).rules([Rule::phone(), Rule::max_length(20)])
}

pub fn required_text(name: impl Into<String>, min: usize, max: usize) -> FieldBuilder {
    FieldBuilder::new(name).rules([Rule::required(), Rule::min_length(min), Rule::max_length(max)])
}

pub fn optional_text(name: impl Into<String>, max: usize) -> FieldBuilder {
    FieldBuilder::new(name).rule(Rule::max_length(max))
}

/// Required money amount with two decimal places and an optional ceiling.
///
/// A ceiling of zero is treated as no ceiling.
pub fn amount(name: impl Into<String>, min: f64, max: Option<f64>) -> FieldBuilder {
    let builder =
        FieldBuilder::new(name).rules([Rule::required(), Rule::decimal(2), Rule::min(min)]);

    match max.filter(|max| *max != 0.0 && !max.is_nan()) {
        Some(max) => builder.rule(Rule::max(max)),
        None => builder,
    }
}

/// Required whole quantity of at least `min`.
pub fn quantity(name: impl Into<String>, min: f64) -> FieldBuilder {
    FieldBuilder::new(name).rules([Rule::required(), Rule::integer(), Rule::min(min)])
}

pub fn date(name: impl Into<String>, required: bool) -> FieldBuilder {
    let builder = FieldBuilder::new(name);
    let builder = if required {
        builder.rule(Rule::required())
    } else {
        builder
    };
    builder.rule(Rule::date())
}

pub fn future_date(name: impl Into<String>) -> FieldBuilder {
    FieldBuilder::new(name).rules([Rule::required(), Rule::date(), Rule::future()])
}

pub fn iban(name: impl Into<String>) -> FieldBuilder {
    FieldBuilder::new(name).rules([Rule::required(), Rule::iban()])
}

/// Required tax registration number in the format of `country`.
pub fn tax_number(name: impl Into<String>, country: impl Into<String>) -> FieldBuilder {
    FieldBuilder::new(name).rules([Rule::required(), Rule::tax_number(country)])
}
