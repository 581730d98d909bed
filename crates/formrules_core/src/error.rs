//! Error types for schema construction.
//!
//! Validation failures are never errors: they are reported as
//! [`ValidationError`](crate::ValidationError) records. The errors here are
//! raised while building a schema that cannot be interpreted.

use thiserror::Error;

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Main error type for schema construction.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Two fields share the same name
    #[error("Duplicate field in schema: {0}")]
    DuplicateField(String),

    /// A `pattern` rule does not compile
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending expression
        pattern: String,
        /// Compiler diagnostic
        message: String,
    },

    /// A `custom` rule names a predicate nobody registered
    #[error("Unknown custom predicate '{name}' referenced by field '{field}'")]
    UnknownPredicate {
        /// Field declaring the rule
        field: String,
        /// Predicate name
        name: String,
    },

    /// Rule kind name not recognized
    #[error("Unknown rule kind: {0}")]
    UnknownRuleKind(String),

    /// Message catalog content has the wrong shape
    #[error("Invalid message catalog: {0}")]
    InvalidCatalog(String),
}
