use anamnesis_core::contract::{ContractPolicy, ErrorKind, Rule, SchemaContract};
use anamnesis_core::models::artifact::RiskLevel;
use anamnesis_core::models::candidate::{GenerationMeta, RawCandidate};
use anamnesis_core::models::outcome::OutcomeStatus;
use anamnesis_core::{check_artifact, validate};
use serde_json::{Value, json};

fn rich_payload() -> Value {
    json!({
        "analysis": "The patient returns repeatedly to the scene of the father's departure, \
                     framing every later loss through it.",
        "themes": ["abandonment", "guilt", "repetition"],
        "signifiers": ["door", "waiting", "silence"],
        "hypotheses": ["unresolved mourning", "identification with the absent father"],
        "questions": [
            "What happened the last time a door closed?",
            "Who waited with you?",
            "What does silence protect?"
        ],
        "risk_assessment": {
            "level": "medium",
            "signals": ["reports insomnia for three weeks", "mentions isolating from friends"]
        },
        "clinical_report": {
            "required": false,
            "summary": "No formal report indicated at this stage."
        }
    })
}

fn candidate(text: impl Into<String>) -> RawCandidate {
    RawCandidate {
        input_id: "session_01.txt".to_string(),
        prompt_version: "v2".to_string(),
        text: text.into(),
        meta: GenerationMeta::default(),
    }
}

fn with(mut payload: Value, pointer: &str, replacement: Value) -> Value {
    *payload
        .pointer_mut(pointer)
        .expect("pointer exists in fixture") = replacement;
    payload
}

#[test]
fn rich_payload_is_promoted_to_artifact() {
    let contract = SchemaContract::default();
    let outcome = validate(&candidate(rich_payload().to_string()), &contract);

    let artifact = outcome.artifact().expect("rich payload should validate");
    assert_eq!(outcome.input_id, "session_01.txt");
    assert_eq!(outcome.prompt_version, "v2");
    assert_eq!(artifact.themes().len(), 3);
    assert_eq!(artifact.risk_assessment().level, RiskLevel::Medium);
    assert_eq!(artifact.risk_assessment().signals.len(), 2);
    assert!(!artifact.clinical_report().required);
}

#[test]
fn validating_an_accepted_artifact_again_finds_nothing() {
    let contract = SchemaContract::default();
    let outcome = validate(&candidate(rich_payload().to_string()), &contract);
    let artifact = outcome.artifact().expect("rich payload should validate");

    let errors = check_artifact(artifact, &contract).expect("artifact serializes");
    assert!(errors.is_empty(), "unexpected violations: {errors:?}");
}

#[test]
fn unparseable_payload_yields_exactly_one_parse_failure() {
    let contract = SchemaContract::default();
    let outcome = validate(&candidate("Sure! Here is the analysis: {themes: ..."), &contract);

    let errors = outcome.validation_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::ParseFailure);
    assert_eq!(errors[0].path, "$");
    assert!(errors[0].message.starts_with("malformed payload"));
}

#[test]
fn json_that_is_not_an_object_is_a_parse_failure() {
    let contract = SchemaContract::default();
    let outcome = validate(&candidate(r#"["abandonment", "guilt"]"#), &contract);

    let errors = outcome.validation_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::ParseFailure);
    assert!(errors[0].message.contains("expected a JSON object, found array"));
}

#[test]
fn empty_risk_signals_fail_with_cardinality_violation() {
    let contract = SchemaContract::default();
    let payload = with(rich_payload(), "/risk_assessment/signals", json!([]));
    let outcome = validate(&candidate(payload.to_string()), &contract);

    assert!(!outcome.is_success());
    let errors = outcome.validation_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::SchemaViolation);
    assert_eq!(errors[0].path, "risk_assessment.signals");
    assert_eq!(errors[0].rule, Some(Rule::Cardinality));
    assert_eq!(errors[0].message, "list has 0 items, minimum 1");
}

#[test]
fn blank_risk_signal_does_not_support_a_risk_level() {
    let contract = SchemaContract::default();
    let payload = with(rich_payload(), "/risk_assessment/level", json!("high"));
    let payload = with(payload, "/risk_assessment/signals", json!(["   "]));
    let outcome = validate(&candidate(payload.to_string()), &contract);

    assert!(!outcome.is_success());
    let errors = outcome.validation_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "risk_assessment.signals[0]");
    assert_eq!(errors[0].rule, Some(Rule::Length));
    assert_eq!(errors[0].message, "list item is blank");
}

#[test]
fn blank_list_items_are_reported_per_item() {
    let contract = SchemaContract::default();
    let payload = with(rich_payload(), "/themes", json!(["", " ", "guilt"]));
    let outcome = validate(&candidate(payload.to_string()), &contract);

    let paths: Vec<&str> = outcome
        .validation_errors()
        .iter()
        .map(|e| e.path.as_str())
        .collect();
    assert_eq!(paths, ["themes[0]", "themes[1]"]);
    assert!(
        outcome
            .validation_errors()
            .iter()
            .all(|e| e.rule == Some(Rule::Length))
    );
}

#[test]
fn omitted_risk_signals_are_not_accepted() {
    let contract = SchemaContract::default();
    let mut payload = rich_payload();
    payload["risk_assessment"]
        .as_object_mut()
        .expect("object")
        .remove("signals");
    let outcome = validate(&candidate(payload.to_string()), &contract);

    let errors = outcome.validation_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "risk_assessment.signals");
    assert_eq!(errors[0].rule, Some(Rule::Missing));
}

#[test]
fn stricter_policy_raises_the_signal_threshold() {
    let contract = SchemaContract::clinical(&ContractPolicy {
        min_risk_signals: 3,
        ..ContractPolicy::default()
    });
    let outcome = validate(&candidate(rich_payload().to_string()), &contract);

    let errors = outcome.validation_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "list has 2 items, minimum 3");
}

#[test]
fn policy_cannot_disable_the_signal_requirement() {
    let contract = SchemaContract::clinical(&ContractPolicy {
        min_risk_signals: 0,
        ..ContractPolicy::default()
    });
    let payload = with(rich_payload(), "/risk_assessment/signals", json!([]));
    let outcome = validate(&candidate(payload.to_string()), &contract);

    assert!(!outcome.is_success());
    assert_eq!(
        outcome.validation_errors()[0].rule,
        Some(Rule::Cardinality)
    );
}

#[test]
fn all_violations_are_reported_in_declaration_order() {
    let contract = SchemaContract::default();
    let payload = json!({
        "analysis": "too short",
        "themes": [],
        "signifiers": ["a", 7, "c"],
        "questions": "what?",
        "risk_assessment": { "level": "severe", "signals": [] },
        "clinical_report": { "required": "yes", "summary": "" }
    });
    let outcome = validate(&candidate(payload.to_string()), &contract);

    let paths: Vec<_> = outcome
        .validation_errors()
        .iter()
        .map(|e| (e.path.as_str(), e.rule))
        .collect();
    assert_eq!(
        paths,
        vec![
            ("analysis", Some(Rule::Length)),
            ("themes", Some(Rule::Cardinality)),
            ("signifiers[1]", Some(Rule::Type)),
            ("hypotheses", Some(Rule::Missing)),
            ("questions", Some(Rule::Type)),
            ("risk_assessment.level", Some(Rule::Enum)),
            ("risk_assessment.signals", Some(Rule::Cardinality)),
            ("clinical_report.required", Some(Rule::Type)),
        ]
    );
    assert!(outcome.artifact().is_none());
}

#[test]
fn list_above_maximum_is_a_cardinality_violation() {
    let contract = SchemaContract::default();
    let payload = with(
        rich_payload(),
        "/hypotheses",
        json!(["one", "two", "three", "four", "five"]),
    );
    let outcome = validate(&candidate(payload.to_string()), &contract);

    let errors = outcome.validation_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "hypotheses");
    assert_eq!(errors[0].message, "list has 5 items, maximum 4");
}

#[test]
fn missing_nested_object_is_one_violation() {
    let contract = SchemaContract::default();
    let payload = with(rich_payload(), "/risk_assessment", json!("high"));
    let outcome = validate(&candidate(payload.to_string()), &contract);

    let errors = outcome.validation_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "risk_assessment");
    assert_eq!(errors[0].message, "expected object, found string");
}

#[test]
fn null_counts_as_missing() {
    let contract = SchemaContract::default();
    let payload = with(rich_payload(), "/analysis", Value::Null);
    let outcome = validate(&candidate(payload.to_string()), &contract);

    let errors = outcome.validation_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "analysis");
    assert_eq!(errors[0].rule, Some(Rule::Missing));
}

#[test]
fn extra_fields_are_ignored() {
    let contract = SchemaContract::default();
    let mut payload = rich_payload();
    payload["confidence"] = json!(0.8);
    let outcome = validate(&candidate(payload.to_string()), &contract);

    assert!(outcome.is_success());
}

#[test]
fn validation_records_generation_usage() {
    let contract = SchemaContract::default();
    let mut raw = candidate(rich_payload().to_string());
    raw.meta.usage.tokens.input = 1200;
    raw.meta.usage.tokens.output = 400;
    let outcome = validate(&raw, &contract);

    let usage = outcome.usage.expect("usage carried over");
    assert_eq!(usage.tokens.total(), 1600);
    assert!(matches!(outcome.status, OutcomeStatus::Success(_)));
}
