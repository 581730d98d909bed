//! # Form Rules Core
//!
//! Core data structures and types for the Form Rules Engine.
//!
//! This crate provides the building blocks for declaring how business forms
//! are validated: which fields exist, which rules apply to each of them, and
//! what an evaluation reports back.
//!
//! ## Key Concepts
//!
//! - **Rule**: One typed check applied to a field's value (`required`, `email`, `decimal`, ...)
//! - **Schema**: The set of named fields of a form, each with an ordered list of rules
//! - **ValidationError**: One failed rule, reported as data rather than raised
//! - **MessageResolver**: Injected localization that turns message keys into text
//!
//! ## Example
//!
//! ```rust
//! use formrules_core::{FieldBuilder, Rule, SchemaBuilder};
//!
//! let schema = SchemaBuilder::new()
//!     .field(
//!         FieldBuilder::new("customer_name")
//!             .label("Customer name")
//!             .rule(Rule::required())
//!             .rule(Rule::max_length(120))
//!             .build(),
//!     )
//!     .field(
//!         FieldBuilder::new("amount")
//!             .rule(Rule::required())
//!             .rule(Rule::decimal(2))
//!             .rule(Rule::min(0.0))
//!             .build(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.rule_count(), 5);
//! ```

pub mod builder;
pub mod definition;
pub mod error;
pub mod messages;
pub mod result;
pub mod rule;
pub mod schema;
pub mod value;

pub use builder::*;
pub use definition::*;
pub use error::*;
pub use messages::*;
pub use result::*;
pub use rule::*;
pub use schema::*;
pub use value::*;
