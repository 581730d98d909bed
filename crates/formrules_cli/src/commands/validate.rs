use anyhow::{Context, Result};
use formrules_core::PredicateRegistry;
use formrules_parser::{parse_file, parse_values_file};
use formrules_validator::{FormStatus, RuleEvaluator};
use std::path::Path;
use tracing::info;

use crate::config::{CliConfig, OutputFormat};
use crate::output;

pub async fn execute(schema_path: &str, values_path: &str, config: &CliConfig) -> Result<()> {
    info!("Validating values {} against {}", values_path, schema_path);
    if let Some(locale) = &config.locale {
        info!("Locale: {}", locale);
    }

    let def = parse_file(Path::new(schema_path))
        .with_context(|| format!("Failed to parse schema file: {}", schema_path))?;
    let schema = def
        .bind(&PredicateRegistry::new())
        .with_context(|| format!("Invalid schema definition: {}", schema_path))?;

    let values = parse_values_file(Path::new(values_path))
        .with_context(|| format!("Failed to parse values file: {}", values_path))?;

    if config.format == OutputFormat::Text {
        output::print_info(&format!(
            "Schema loaded: {} ({} fields, {} rules)",
            def.name.as_deref().unwrap_or(schema_path),
            schema.len(),
            schema.rule_count()
        ));
    }

    let evaluator = RuleEvaluator::with_resolver(config.resolver()?);
    let result = evaluator.evaluate_all(&schema, &values).await;
    let status = FormStatus::from_result(&schema, &result);

    output::print_evaluation_report(&schema, &result, &status, config.format);

    if !result.is_valid {
        std::process::exit(1);
    }

    Ok(())
}
