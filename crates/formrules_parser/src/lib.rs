//! Loader for Form Rules definition files (YAML/TOML/JSON formats).
//!
//! This module parses form schema definitions into [`SchemaDef`], message
//! catalogs into [`MessageCatalog`] and value bags into [`FieldValues`].
//!
//! # Example
//!
//! ```rust
//! use formrules_core::PredicateRegistry;
//! use formrules_parser::parse_yaml;
//!
//! let yaml = r#"
//! name: customer
//! description: New customer form
//! fields:
//!   - name: email
//!     label: Email
//!     rules:
//!       - type: required
//!       - type: email
//!   - name: vat_number
//!     rules:
//!       - type: taxNumber
//!         value: SA
//! "#;
//!
//! let def = parse_yaml(yaml).expect("Failed to parse schema");
//! assert_eq!(def.name.as_deref(), Some("customer"));
//!
//! let schema = def.bind(&PredicateRegistry::new()).unwrap();
//! assert_eq!(schema.rule_count(), 3);
//! ```

use formrules_core::{FieldValues, MessageCatalog, SchemaDef, SchemaError};
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading definition files.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// JSON parsing or deserialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// Message catalog has the wrong shape
    #[error("Invalid message catalog: {0}")]
    CatalogError(#[from] SchemaError),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported definition file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

fn from_str<T: DeserializeOwned>(content: &str, format: SourceFormat) -> Result<T> {
    match format {
        SourceFormat::Yaml => Ok(serde_yaml_ng::from_str(content)?),
        SourceFormat::Toml => {
            toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))
        }
        SourceFormat::Json => Ok(serde_json::from_str(content)?),
    }
}

fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    debug!("Parsing {} as {:?}", path.display(), format);
    from_str(&content, format)
}

/// Parse a schema definition from a YAML string.
pub fn parse_yaml(content: &str) -> Result<SchemaDef> {
    from_str(content, SourceFormat::Yaml)
}

/// Parse a schema definition from a TOML string.
///
/// # Example
///
/// ```rust
/// use formrules_parser::parse_toml;
///
/// let toml = r#"
/// name = "invoice"
///
/// [[fields]]
/// name = "amount"
/// rules = [
///     { type = "required" },
///     { type = "decimal", value = 2 },
///     { type = "min", value = 0 },
/// ]
/// "#;
///
/// let def = parse_toml(toml).unwrap();
/// assert_eq!(def.fields[0].rules.len(), 3);
/// ```
pub fn parse_toml(content: &str) -> Result<SchemaDef> {
    from_str(content, SourceFormat::Toml)
}

/// Parse a schema definition from a JSON string.
pub fn parse_json(content: &str) -> Result<SchemaDef> {
    from_str(content, SourceFormat::Json)
}

/// Detect the file format from a path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `SourceFormat::Yaml`
/// * `.toml` → `SourceFormat::Toml`
/// * `.json` → `SourceFormat::Json`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<SourceFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(SourceFormat::Yaml),
        "toml" => Ok(SourceFormat::Toml),
        "json" => Ok(SourceFormat::Json),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a schema definition from a file with automatic format detection.
///
/// ```no_run
/// use formrules_parser::parse_file;
/// use std::path::Path;
///
/// let def = parse_file(Path::new("forms/customer.yml")).unwrap();
/// println!("Loaded {} fields", def.fields.len());
/// ```
pub fn parse_file(path: &Path) -> Result<SchemaDef> {
    read_file(path)
}

/// Parse a message catalog from a file.
///
/// The file holds a nested tree of templates; nested keys are joined with
/// dots. Without an explicit `locale` the file stem is used (`ar.json` is
/// the `ar` catalog).
pub fn parse_catalog_file(path: &Path, locale: Option<&str>) -> Result<MessageCatalog> {
    let tree: serde_json::Value = read_file(path)?;
    let locale = locale
        .map(str::to_string)
        .or_else(|| path.file_stem().and_then(|s| s.to_str()).map(str::to_string));

    let catalog = MessageCatalog::from_tree(locale, tree)?;
    debug!("Loaded {} messages from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Parse a bag of form values from a file.
pub fn parse_values_file(path: &Path) -> Result<FieldValues> {
    read_file(path)
}
