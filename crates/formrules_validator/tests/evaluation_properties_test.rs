//! Behavioral properties of the rule evaluator.
//!
//! These tests pin down the semantics forms rely on:
//! - `required` is the only check that fails on empty input
//! - every failing rule is reported, in order
//! - `is_valid` always agrees with the error list
//! - a broken custom predicate never takes the form down with it

use async_trait::async_trait;
use formrules_core::{
    FieldBuilder, FieldValue, FieldValues, Predicate, Rule, RuleKind, Schema, SchemaBuilder,
    field_values,
};
use formrules_validator::{RuleEvaluator, presets};
use std::collections::BTreeMap;
use std::sync::Arc;

fn single_field(rules: Vec<Rule>) -> Schema {
    SchemaBuilder::new()
        .field(FieldBuilder::new("field").rules(rules).build())
        .build()
        .unwrap()
}

async fn kinds_for(schema: &Schema, value: FieldValue) -> Vec<RuleKind> {
    RuleEvaluator::new()
        .evaluate_field(schema, "field", &value, &FieldValues::new())
        .await
        .iter()
        .map(|e| e.rule_kind)
        .collect()
}

#[tokio::test]
async fn test_required_fails_only_on_empty_values() {
    let schema = single_field(vec![Rule::required()]);

    let failing = [
        FieldValue::Null,
        FieldValue::from(""),
        FieldValue::from("   "),
        FieldValue::List(vec![]),
    ];
    for value in failing {
        assert_eq!(
            kinds_for(&schema, value.clone()).await,
            vec![RuleKind::Required],
            "required should fail on {value:?}"
        );
    }

    let passing = [
        FieldValue::from(0),
        FieldValue::from(false),
        FieldValue::from(0.0),
        FieldValue::from("0"),
        FieldValue::List(vec![FieldValue::Null]),
        FieldValue::Map(BTreeMap::new()),
    ];
    for value in passing {
        assert!(
            kinds_for(&schema, value.clone()).await.is_empty(),
            "required should pass on {value:?}"
        );
    }
}

#[tokio::test]
async fn test_rules_do_not_short_circuit() {
    let schema = single_field(vec![Rule::required(), Rule::min_length(5)]);
    assert_eq!(kinds_for(&schema, "".into()).await, vec![RuleKind::Required]);
    assert_eq!(kinds_for(&schema, "ab".into()).await, vec![RuleKind::MinLength]);

    let schema = single_field(vec![Rule::min_length(5), Rule::max_length(2)]);
    assert!(kinds_for(&schema, FieldValue::Null).await.is_empty());
    assert_eq!(
        kinds_for(&schema, "abc".into()).await,
        vec![RuleKind::MinLength, RuleKind::MaxLength]
    );
}

#[tokio::test]
async fn test_decimal_boundary() {
    let schema = single_field(vec![Rule::decimal(2)]);
    assert!(kinds_for(&schema, "12.34".into()).await.is_empty());
    assert!(kinds_for(&schema, "12".into()).await.is_empty());
    assert_eq!(kinds_for(&schema, "12.345".into()).await, vec![RuleKind::Decimal]);
}

#[tokio::test]
async fn test_iban_acceptance() {
    let schema = single_field(vec![Rule::iban()]);
    assert!(
        kinds_for(&schema, "GB29 NWBK 6016 1331 9268 19".into())
            .await
            .is_empty()
    );
    assert_eq!(kinds_for(&schema, "1234".into()).await, vec![RuleKind::Iban]);
}

#[tokio::test]
async fn test_validity_invariant() {
    let evaluator = RuleEvaluator::new();

    let empty = SchemaBuilder::new().build().unwrap();
    let result = evaluator
        .evaluate_all(&empty, &field_values([("anything", "goes")]))
        .await;
    assert!(result.is_valid);
    assert!(result.errors.is_empty());

    let schema = SchemaBuilder::new()
        .field(presets::email("email").build())
        .field(presets::quantity("qty", 1.0).build())
        .field(presets::optional_text("notes", 10).build())
        .build()
        .unwrap();

    let bags = [
        FieldValues::new(),
        field_values([("email", "a@b.co"), ("qty", "3")]),
        field_values([("email", "nope"), ("qty", "0"), ("notes", "far too long for this")]),
        field_values([("email", FieldValue::from("a@b.co")), ("qty", FieldValue::from(2.5))]),
    ];

    for values in bags {
        let result = evaluator.evaluate_all(&schema, &values).await;
        assert_eq!(result.is_valid, result.errors.is_empty(), "{values:?}");

        let grouped: usize = result.field_errors.values().map(Vec::len).sum();
        assert_eq!(grouped, result.errors.len());
    }
}

struct FailingLookup;

#[async_trait]
impl Predicate for FailingLookup {
    async fn test(&self, _value: &FieldValue, _values: &FieldValues) -> anyhow::Result<bool> {
        tokio::task::yield_now().await;
        anyhow::bail!("service unavailable")
    }
}

#[tokio::test]
async fn test_erroring_predicate_is_contained() {
    let schema = single_field(vec![Rule::custom(Arc::new(FailingLookup))]);

    let result = RuleEvaluator::new()
        .evaluate_all(&schema, &field_values([("field", "x")]))
        .await;

    assert!(!result.is_valid);
    assert_eq!(result.errors[0].rule_kind, RuleKind::Custom);
    assert_eq!(result.errors[0].message, "validation.invalid");
}

#[tokio::test]
async fn test_panicking_predicate_does_not_stop_other_fields() {
    let schema = SchemaBuilder::new()
        .field(
            FieldBuilder::new("code")
                .rule(Rule::custom_fn(|_, _| panic!("unexpected input")))
                .rule(Rule::max_length(3))
                .build(),
        )
        .field(presets::email("email").build())
        .build()
        .unwrap();

    let result = RuleEvaluator::new()
        .evaluate_all(&schema, &field_values([("code", "ABCD"), ("email", "bad")]))
        .await;

    assert!(!result.is_valid);
    assert_eq!(
        result.errors_for("code").iter().map(|e| e.rule_kind).collect::<Vec<_>>(),
        vec![RuleKind::Custom, RuleKind::MaxLength]
    );
    assert_eq!(result.errors_for("email")[0].rule_kind, RuleKind::Email);
}
