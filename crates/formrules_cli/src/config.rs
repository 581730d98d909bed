//! Runtime configuration for the CLI.
//!
//! Values come from command-line flags, falling back to the
//! `FORMRULES_CATALOG` and `FORMRULES_LOCALE` environment variables.

use anyhow::{Context, Result, bail};
use formrules_core::{KeyResolver, MessageCatalog, MessageResolver};
use formrules_parser::parse_catalog_file;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Locale served by the built-in catalog.
pub const BUILTIN_LOCALE: &str = "en";

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => bail!("Unsupported output format '{}': expected 'text' or 'json'", other),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Validated settings shared by the commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliConfig {
    pub format: OutputFormat,
    pub catalog: Option<PathBuf>,
    pub locale: Option<String>,
}

impl CliConfig {
    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Fails on an unknown output format, an empty locale or a catalog path
    /// that does not exist.
    pub fn new(format: &str, catalog: Option<PathBuf>, locale: Option<String>) -> Result<Self> {
        let format = format.parse()?;

        if let Some(path) = catalog.as_ref().filter(|p| !p.is_file()) {
            bail!("Message catalog not found: {}", path.display());
        }

        let locale = match locale.map(|l| l.trim().to_string()) {
            Some(l) if l.is_empty() => bail!("Locale must not be empty"),
            other => other,
        };

        Ok(Self {
            format,
            catalog,
            locale,
        })
    }

    /// Builds the message resolver for this configuration.
    ///
    /// A catalog file wins; otherwise the `en` locale selects the built-in
    /// English catalog and anything else reports plain message keys.
    pub fn resolver(&self) -> Result<Arc<dyn MessageResolver>> {
        if let Some(path) = &self.catalog {
            let catalog = parse_catalog_file(path, self.locale.as_deref()).with_context(|| {
                format!("Failed to load message catalog: {}", path.display())
            })?;
            debug!("Using message catalog {}", path.display());
            return Ok(Arc::new(catalog));
        }

        match self.locale.as_deref() {
            Some(locale) if locale.eq_ignore_ascii_case(BUILTIN_LOCALE) => {
                Ok(Arc::new(MessageCatalog::english()))
            }
            Some(locale) => {
                debug!("No catalog for locale '{}', reporting message keys", locale);
                Ok(Arc::new(KeyResolver))
            }
            None => Ok(Arc::new(KeyResolver)),
        }
    }
}
