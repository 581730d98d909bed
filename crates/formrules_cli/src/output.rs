use crate::config::OutputFormat;
use colored::*;
use formrules_core::{DefinitionFinding, EvaluationResult, Schema};
use formrules_validator::FormStatus;
use serde_json::json;

pub fn print_evaluation_report(
    schema: &Schema,
    result: &EvaluationResult,
    status: &FormStatus,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => print_json_report(result, status),
        OutputFormat::Text => print_text_report(schema, result, status),
    }
}

fn print_text_report(schema: &Schema, result: &EvaluationResult, status: &FormStatus) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  VALIDATION REPORT".bold());
    println!("{}", "═".repeat(60));

    if result.is_valid {
        println!("\n{} {}", "✓".green().bold(), "Form is VALID".green().bold());
    } else {
        println!("\n{} {}", "✗".red().bold(), "Form is INVALID".red().bold());
    }

    if !result.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for name in schema.field_names() {
            let errors = result.errors_for(name);
            if errors.is_empty() {
                continue;
            }
            println!("  {}", name.bold());
            for error in errors {
                println!("    - [{}] {}", error.rule_kind, error.message.red());
            }
        }
    }

    if !result.warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for (i, warning) in result.warnings.iter().enumerate() {
            println!("  {}. {}", i + 1, warning.to_string().yellow());
        }
    }

    println!("\n{}", "Summary:".bold());
    println!(
        "  Valid fields:   {}/{} ({}%)",
        status.valid_fields,
        status.total_fields,
        status.percentage()
    );
    println!("  Total errors:   {}", result.errors.len());
    println!("  Total warnings: {}", result.warnings.len());
    println!("{}", "═".repeat(60));
}

fn print_json_report(result: &EvaluationResult, status: &FormStatus) {
    let output = json!({
        "is_valid": result.is_valid,
        "errors": result.errors,
        "warnings": result.warnings,
        "field_errors": result.field_errors,
        "status": {
            "total_fields": status.total_fields,
            "valid_fields": status.valid_fields,
            "error_count": status.error_count,
            "percentage": status.percentage(),
            "complete": status.is_complete(),
        }
    });

    print_json(&output);
}

pub fn print_definition_report(
    schema: &Schema,
    findings: &[DefinitionFinding],
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let fields: Vec<_> = schema
                .fields()
                .iter()
                .map(|field| {
                    json!({
                        "name": field.name,
                        "label": field.label,
                        "rules": field.rules.iter().map(|r| r.kind()).collect::<Vec<_>>(),
                        "depends_on": field.depends_on,
                    })
                })
                .collect();

            print_json(&json!({
                "fields": fields,
                "rule_count": schema.rule_count(),
                "findings": findings.iter().map(|f| f.to_string()).collect::<Vec<_>>(),
            }));
        }
        OutputFormat::Text => {
            if findings.is_empty() {
                print_success("No definition issues found");
            } else {
                println!("\n{}", "Findings:".yellow().bold());
                for (i, finding) in findings.iter().enumerate() {
                    println!("  {}. {}", i + 1, finding.to_string().yellow());
                }
            }
        }
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => print_error(&format!("Failed to render JSON report: {}", e)),
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
