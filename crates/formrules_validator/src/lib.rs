//! # Form Rules Validator
//!
//! Evaluation engine for form schemas. This crate provides the logic that
//! checks entered values against field rules, including:
//!
//! - Built-in checks (presence, length, numeric bounds, formats, dates)
//! - Async custom predicates with failure containment
//! - Touch-gated interaction state for live forms
//! - Ready-made presets for common business fields
//!
//! ## Example
//!
//! ```rust
//! use formrules_core::{SchemaBuilder, field_values};
//! use formrules_validator::{RuleEvaluator, presets};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let schema = SchemaBuilder::new()
//!     .field(presets::iban("account").build())
//!     .field(presets::amount("total", 0.0, None).build())
//!     .build()
//!     .unwrap();
//!
//! let values = field_values([("account", "GB29 NWBK 6016 1331 9268 19"), ("total", "12.50")]);
//! let result = RuleEvaluator::new().evaluate_all(&schema, &values).await;
//!
//! if result.is_valid {
//!     println!("Form is valid!");
//! } else {
//!     println!("Form has errors: {:?}", result.errors);
//! }
//! # }
//! ```

mod checks;
mod engine;
mod interaction;
pub mod presets;
mod status;

pub use checks::*;
pub use engine::*;
pub use interaction::*;
pub use status::*;
