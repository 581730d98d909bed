use anyhow::{Context, Result};
use formrules_core::{Check, CheckDef, PredicateRegistry, Schema, SchemaDef};
use formrules_parser::parse_file;
use formrules_validator::tax_countries;
use std::path::Path;
use tracing::info;

use crate::config::OutputFormat;
use crate::output;

pub async fn execute(schema_path: &str, format: &str) -> Result<()> {
    info!("Checking form schema: {}", schema_path);
    let format: OutputFormat = format.parse()?;

    let path = Path::new(schema_path);
    let def = parse_file(path)
        .with_context(|| format!("Failed to parse schema file: {}", schema_path))?;

    let registry = placeholder_registry(&def);
    let schema = def
        .bind(&registry)
        .with_context(|| format!("Invalid schema definition: {}", schema_path))?;

    if format == OutputFormat::Text {
        output::print_success("Schema definition is valid");

        println!("\nSchema Summary:");
        println!("  Name:        {}", def.name.as_deref().unwrap_or("N/A"));
        println!(
            "  Description: {}",
            def.description.as_deref().unwrap_or("N/A")
        );
        println!("  Fields:      {}", schema.len());
        println!("  Rules:       {}", schema.rule_count());

        println!("\nFields:");
        for field in schema.fields() {
            let kinds: Vec<String> = field.rules.iter().map(|r| r.kind().to_string()).collect();
            let label = field
                .label
                .as_deref()
                .map(|l| format!(" ({})", l))
                .unwrap_or_default();
            println!("  {}{}: {}", field.name, label, kinds.join(", "));
        }

        if !registry.names().is_empty() {
            println!("\nCustom predicates: {}", registry.names().join(", "));
        }

        for (field, country) in untyped_tax_numbers(&schema) {
            output::print_info(&format!(
                "Field '{}': no tax number format for '{}' (known: {}), any text passes",
                field,
                country,
                tax_countries().join(", ")
            ));
        }
    }

    let findings = schema.check_definition();
    output::print_definition_report(&schema, &findings, format);

    Ok(())
}

/// Registers an always-passing stand-in for every custom rule name, so a
/// definition can be checked without the host application's predicates.
fn placeholder_registry(def: &SchemaDef) -> PredicateRegistry {
    let mut registry = PredicateRegistry::new();
    for field in &def.fields {
        for rule in &field.rules {
            if let CheckDef::Custom { name } = &rule.check {
                registry.register_fn(name.clone(), |_, _| true);
            }
        }
    }
    registry
}

/// Tax number rules whose country has no dedicated format.
fn untyped_tax_numbers(schema: &Schema) -> Vec<(&str, &str)> {
    let known = tax_countries();
    let mut untyped = Vec::new();
    for field in schema.fields() {
        for rule in &field.rules {
            if let Check::TaxNumber(country) = &rule.check {
                if !known.iter().any(|k| *k == country) {
                    untyped.push((field.name.as_str(), country.as_str()));
                }
            }
        }
    }
    untyped
}
