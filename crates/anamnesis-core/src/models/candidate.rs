use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::token_count::TokenUsage;

/// Unparsed output of one generation call.
///
/// The text is captured verbatim. A `RawCandidate` only exists when the
/// call itself succeeded; call failures are reported as
/// [`CallFailure`](crate::generate::CallFailure) instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCandidate {
    pub input_id: String,
    pub prompt_version: String,
    pub text: String,
    pub meta: GenerationMeta,
}

/// Bookkeeping captured alongside the raw text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationMeta {
    pub model_id: String,
    pub usage: TokenUsage,
    pub latency_ms: u64,
}

/// The raw text resolved into either key/value data or an opaque string.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidatePayload {
    Structured(Map<String, Value>),
    Unparseable { text: String, reason: String },
}

impl RawCandidate {
    /// Parse the raw text. Only a JSON object counts as structured.
    pub fn payload(&self) -> CandidatePayload {
        match serde_json::from_str::<Value>(&self.text) {
            Ok(Value::Object(map)) => CandidatePayload::Structured(map),
            Ok(other) => CandidatePayload::Unparseable {
                text: self.text.clone(),
                reason: format!("expected a JSON object, found {}", json_type_name(&other)),
            },
            Err(e) => CandidatePayload::Unparseable {
                text: self.text.clone(),
                reason: e.to_string(),
            },
        }
    }
}

/// Human-readable JSON type name used in violation messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
