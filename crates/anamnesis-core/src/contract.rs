//! The declarative schema contract a clinical analysis must satisfy.
//!
//! A [`SchemaContract`] is an ordered list of [`FieldRule`]s. Checking a
//! payload walks the rules in declaration order and collects every
//! violation rather than stopping at the first one, so a caller sees all
//! defects of a candidate in a single pass.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::artifact::RiskLevel;
use crate::models::candidate::json_type_name;

// ── Violations ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The payload was not structured data at all.
    ParseFailure,
    /// The payload parsed but broke a field rule.
    SchemaViolation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ParseFailure => "parse_failure",
            ErrorKind::SchemaViolation => "schema_violation",
        }
    }
}

/// Which rule a schema violation broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Missing,
    Type,
    Cardinality,
    Length,
    Enum,
}

/// One structural or semantic violation, located by a path such as
/// `risk_assessment.signals` or `themes[2]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{path}: {message}")]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rule: Option<Rule>,
    pub message: String,
}

impl ValidationError {
    /// Path used for violations that concern the payload as a whole.
    pub const ROOT: &'static str = "$";

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ParseFailure,
            path: Self::ROOT.to_string(),
            rule: None,
            message: format!("malformed payload: {}", reason.into()),
        }
    }

    pub fn violation(path: impl Into<String>, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::SchemaViolation,
            path: path.into(),
            rule: Some(rule),
            message: message.into(),
        }
    }
}

// ── Capability ───────────────────────────────────────────────────────────────

/// Anything that can check a structured payload and report every violation.
pub trait Validator: Send + Sync {
    /// Return all violations in rule order; empty means the payload is valid.
    fn check(&self, payload: &Map<String, Value>) -> Vec<ValidationError>;
}

// ── Declarative contract ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    Text {
        min_chars: usize,
    },
    Bool,
    OneOf {
        values: Vec<String>,
    },
    TextList {
        min_items: usize,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        max_items: Option<usize>,
    },
    Object {
        fields: Vec<FieldRule>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub name: String,
    pub required: bool,
    pub field_type: FieldType,
}

impl FieldRule {
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            required: true,
            field_type,
        }
    }

    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            required: false,
            field_type,
        }
    }
}

/// Tunable thresholds of the clinical contract.
///
/// `min_risk_signals` is a policy choice rather than a clinical guarantee.
/// It can be raised but never lowered below 1: an asserted risk level
/// without any supporting signal is always rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractPolicy {
    pub min_risk_signals: usize,
    pub min_analysis_chars: usize,
}

impl Default for ContractPolicy {
    fn default() -> Self {
        Self {
            min_risk_signals: 1,
            min_analysis_chars: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaContract {
    pub fields: Vec<FieldRule>,
}

fn text_list(min_items: usize, max_items: usize) -> FieldType {
    FieldType::TextList {
        min_items,
        max_items: Some(max_items),
    }
}

impl SchemaContract {
    /// The clinical analysis contract.
    pub fn clinical(policy: &ContractPolicy) -> Self {
        let fields = vec![
            FieldRule::required(
                "analysis",
                FieldType::Text {
                    min_chars: policy.min_analysis_chars,
                },
            ),
            FieldRule::required("themes", text_list(3, 6)),
            FieldRule::required("signifiers", text_list(3, 8)),
            FieldRule::required("hypotheses", text_list(2, 4)),
            FieldRule::required("questions", text_list(3, 6)),
            FieldRule::required(
                "risk_assessment",
                FieldType::Object {
                    fields: vec![
                        FieldRule::required(
                            "level",
                            FieldType::OneOf {
                                values: RiskLevel::ALL.iter().map(|v| v.to_string()).collect(),
                            },
                        ),
                        FieldRule::required(
                            "signals",
                            FieldType::TextList {
                                min_items: policy.min_risk_signals.max(1),
                                max_items: None,
                            },
                        ),
                    ],
                },
            ),
            FieldRule::required(
                "clinical_report",
                FieldType::Object {
                    fields: vec![
                        FieldRule::required("required", FieldType::Bool),
                        FieldRule::required("summary", FieldType::Text { min_chars: 0 }),
                    ],
                },
            ),
        ];
        Self { fields }
    }
}

impl Default for SchemaContract {
    fn default() -> Self {
        Self::clinical(&ContractPolicy::default())
    }
}

impl Validator for SchemaContract {
    fn check(&self, payload: &Map<String, Value>) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        check_fields(&self.fields, payload, "", &mut errors);
        errors
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn check_fields(
    rules: &[FieldRule],
    object: &Map<String, Value>,
    prefix: &str,
    errors: &mut Vec<ValidationError>,
) {
    for rule in rules {
        let path = join_path(prefix, &rule.name);
        match object.get(&rule.name) {
            None | Some(Value::Null) => {
                if rule.required {
                    errors.push(ValidationError::violation(
                        path,
                        Rule::Missing,
                        "required field is missing",
                    ));
                }
            }
            Some(value) => check_value(&rule.field_type, value, &path, errors),
        }
    }
}

fn type_mismatch(path: &str, expected: &str, found: &Value) -> ValidationError {
    ValidationError::violation(
        path,
        Rule::Type,
        format!("expected {expected}, found {}", json_type_name(found)),
    )
}

fn check_value(field_type: &FieldType, value: &Value, path: &str, errors: &mut Vec<ValidationError>) {
    match field_type {
        FieldType::Text { min_chars } => match value.as_str() {
            Some(s) => {
                let len = s.chars().count();
                if len < *min_chars {
                    errors.push(ValidationError::violation(
                        path,
                        Rule::Length,
                        format!("string has {len} characters, minimum {min_chars}"),
                    ));
                }
            }
            None => errors.push(type_mismatch(path, "string", value)),
        },

        FieldType::Bool => {
            if !value.is_boolean() {
                errors.push(type_mismatch(path, "boolean", value));
            }
        }

        FieldType::OneOf { values } => match value.as_str() {
            Some(s) if values.iter().any(|v| v == s) => {}
            Some(s) => errors.push(ValidationError::violation(
                path,
                Rule::Enum,
                format!("value {s:?} is not one of: {}", values.join(", ")),
            )),
            None => errors.push(type_mismatch(path, "string", value)),
        },

        FieldType::TextList {
            min_items,
            max_items,
        } => {
            let Some(items) = value.as_array() else {
                errors.push(type_mismatch(path, "list", value));
                return;
            };

            let count = items.len();
            if count < *min_items {
                errors.push(ValidationError::violation(
                    path,
                    Rule::Cardinality,
                    format!("list has {count} items, minimum {min_items}"),
                ));
            }
            if let Some(max) = max_items
                && count > *max
            {
                errors.push(ValidationError::violation(
                    path,
                    Rule::Cardinality,
                    format!("list has {count} items, maximum {max}"),
                ));
            }

            for (i, item) in items.iter().enumerate() {
                match item.as_str() {
                    Some(s) if s.trim().is_empty() => errors.push(ValidationError::violation(
                        format!("{path}[{i}]"),
                        Rule::Length,
                        "list item is blank",
                    )),
                    Some(_) => {}
                    None => errors.push(type_mismatch(&format!("{path}[{i}]"), "string", item)),
                }
            }
        }

        FieldType::Object { fields } => match value.as_object() {
            Some(object) => check_fields(fields, object, path, errors),
            None => errors.push(type_mismatch(path, "object", value)),
        },
    }
}
