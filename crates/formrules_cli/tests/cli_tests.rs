use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to test fixtures
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

/// Helper to create a Command for the formrules binary
#[allow(deprecated)]
fn formrules() -> Command {
    let mut cmd = Command::cargo_bin("formrules").expect("Failed to find formrules binary");
    cmd.env_remove("FORMRULES_CATALOG")
        .env_remove("FORMRULES_LOCALE");
    cmd
}

// ============================================================================
// check command tests
// ============================================================================

#[test]
fn test_check_yaml_schema() {
    formrules()
        .arg("check")
        .arg(fixture_path("customer_form.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("customer"))
        .stdout(predicate::str::contains("Fields:      5"))
        .stdout(predicate::str::contains("company_name (Company name)"))
        .stdout(predicate::str::contains("taxNumber"))
        .stdout(predicate::str::contains("No definition issues found"));
}

#[test]
fn test_check_toml_schema() {
    formrules()
        .arg("check")
        .arg(fixture_path("customer_form.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("customer_toml"))
        .stdout(predicate::str::contains("Rules:       5"));
}

#[test]
fn test_check_json_schema() {
    formrules()
        .arg("check")
        .arg(fixture_path("order_form.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("quantity: required, integer, min"));
}

#[test]
fn test_check_reports_findings() {
    formrules()
        .arg("check")
        .arg(fixture_path("review_form.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Findings:"))
        .stdout(predicate::str::contains("'unique'"))
        .stdout(predicate::str::contains("Field 'notes' has no rules"))
        .stdout(predicate::str::contains("'reference'"))
        .stdout(predicate::str::contains("Custom predicates: matchesCode"));
}

#[test]
fn test_check_json_output() {
    let output = formrules()
        .arg("check")
        .arg(fixture_path("review_form.yml"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("check output should be JSON");
    assert_eq!(json["rule_count"], 2);
    assert_eq!(json["findings"].as_array().unwrap().len(), 3);
    assert_eq!(json["fields"][0]["rules"][0], "unique");
}

#[test]
fn test_check_notes_unknown_tax_country() {
    formrules()
        .arg("check")
        .arg(fixture_path("vendor_form.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("no tax number format for 'FR'"))
        .stdout(predicate::str::contains("AE, EG, SA, UK, US"));
}

#[test]
fn test_check_known_tax_country_has_no_note() {
    formrules()
        .arg("check")
        .arg(fixture_path("customer_form.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("no tax number format").not());
}

#[test]
fn test_check_invalid_schema() {
    formrules()
        .arg("check")
        .arg(fixture_path("invalid_form.yml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_check_missing_file() {
    formrules()
        .arg("check")
        .arg("nonexistent.yml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_check_unsupported_extension() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("form.xml");
    fs::write(&file, "<form/>").unwrap();

    formrules()
        .arg("check")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

// ============================================================================
// validate command tests
// ============================================================================

#[test]
fn test_validate_valid_values() {
    formrules()
        .arg("validate")
        .arg(fixture_path("customer_form.yml"))
        .arg(fixture_path("valid_customer.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Form is VALID"))
        .stdout(predicate::str::contains("5/5 (100%)"));
}

#[test]
fn test_validate_invalid_values() {
    formrules()
        .arg("validate")
        .arg(fixture_path("customer_form.yml"))
        .arg(fixture_path("invalid_customer.json"))
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Form is INVALID"))
        .stdout(predicate::str::contains("[minLength]"))
        .stdout(predicate::str::contains("validation.minLength"))
        .stdout(predicate::str::contains("validation.iban"))
        .stdout(predicate::str::contains("validation.decimal"))
        .stdout(predicate::str::contains("Total errors:   5"));
}

#[test]
fn test_validate_json_output() {
    let output = formrules()
        .arg("validate")
        .arg(fixture_path("customer_form.yml"))
        .arg(fixture_path("invalid_customer.json"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("validate output should be JSON");
    assert_eq!(json["is_valid"], false);
    assert_eq!(json["errors"].as_array().unwrap().len(), 5);
    assert_eq!(json["field_errors"]["vat_number"][0]["rule"], "required");
    assert_eq!(json["field_errors"]["vat_number"][0]["severity"], "error");
    assert_eq!(json["status"]["percentage"], 0);
    assert_eq!(json["status"]["complete"], false);
}

#[test]
fn test_validate_json_output_complete() {
    let output = formrules()
        .arg("validate")
        .arg(fixture_path("customer_form.yml"))
        .arg(fixture_path("valid_customer.json"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"]["percentage"], 100);
    assert_eq!(json["status"]["complete"], true);
}

#[test]
fn test_validate_english_locale() {
    formrules()
        .arg("validate")
        .arg(fixture_path("customer_form.yml"))
        .arg(fixture_path("invalid_customer.json"))
        .arg("--locale")
        .arg("en")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "Company name must be at least 2 characters",
        ))
        .stdout(predicate::str::contains("vat_number is required"));
}

#[test]
fn test_validate_with_catalog() {
    formrules()
        .arg("validate")
        .arg(fixture_path("customer_form.yml"))
        .arg(fixture_path("invalid_customer.json"))
        .arg("--catalog")
        .arg(fixture_path("ar.json"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("الرقم الضريبي مطلوب"))
        // keys missing from the catalog fall back to the key itself
        .stdout(predicate::str::contains("validation.iban"));
}

#[test]
fn test_validate_locale_from_env() {
    formrules()
        .env("FORMRULES_LOCALE", "en")
        .arg("validate")
        .arg(fixture_path("order_form.json"))
        .arg(fixture_path("valid_customer.json"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("quantity is required"));
}

#[test]
fn test_validate_message_override() {
    let temp_dir = TempDir::new().unwrap();
    let values = temp_dir.path().join("order.json");
    fs::write(
        &values,
        r#"{"quantity": 2, "notes": "deliver before noon on friday"}"#,
    )
    .unwrap();

    formrules()
        .arg("validate")
        .arg(fixture_path("order_form.json"))
        .arg(&values)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Notes are too long"));
}

#[test]
fn test_validate_yaml_values() {
    let temp_dir = TempDir::new().unwrap();
    let values = temp_dir.path().join("order.yaml");
    fs::write(&values, "quantity: 3\nnotes: fragile\n").unwrap();

    formrules()
        .arg("validate")
        .arg(fixture_path("order_form.json"))
        .arg(&values)
        .assert()
        .success()
        .stdout(predicate::str::contains("2/2 (100%)"));
}

#[test]
fn test_validate_unknown_predicate() {
    let temp_dir = TempDir::new().unwrap();
    let values = temp_dir.path().join("values.json");
    fs::write(&values, "{}").unwrap();

    formrules()
        .arg("validate")
        .arg(fixture_path("review_form.yml"))
        .arg(&values)
        .assert()
        .failure()
        .stderr(predicate::str::contains("matchesCode"));
}

#[test]
fn test_validate_with_invalid_format() {
    formrules()
        .arg("validate")
        .arg(fixture_path("customer_form.yml"))
        .arg(fixture_path("valid_customer.json"))
        .arg("--format")
        .arg("xml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported output format"));
}

#[test]
fn test_validate_missing_catalog() {
    formrules()
        .arg("validate")
        .arg(fixture_path("customer_form.yml"))
        .arg(fixture_path("valid_customer.json"))
        .arg("--catalog")
        .arg("missing.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Message catalog not found"));
}

#[test]
fn test_validate_empty_values_file() {
    let temp_dir = TempDir::new().unwrap();
    let empty_file = temp_dir.path().join("empty.json");
    fs::write(&empty_file, "").unwrap();

    formrules()
        .arg("validate")
        .arg(fixture_path("customer_form.yml"))
        .arg(&empty_file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse values file"));
}

// ============================================================================
// general tests
// ============================================================================

#[test]
fn test_cli_help() {
    formrules()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Form Rules Engine CLI"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_cli_version() {
    formrules()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("formrules"));
}

#[test]
fn test_validate_help() {
    formrules()
        .arg("validate")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--catalog"))
        .stdout(predicate::str::contains("--locale"))
        .stdout(predicate::str::contains("FORMRULES_LOCALE"));
}
