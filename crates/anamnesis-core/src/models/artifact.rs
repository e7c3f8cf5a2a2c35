use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The validated clinical analysis of one input.
///
/// There is no public constructor: the only way to obtain an artifact is
/// for [`validate`](crate::validate::validate) to accept a candidate
/// against the schema contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClinicalAnalysisArtifact {
    body: AnalysisBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AnalysisBody {
    analysis: String,
    themes: Vec<String>,
    signifiers: Vec<String>,
    hypotheses: Vec<String>,
    questions: Vec<String>,
    risk_assessment: RiskAssessment,
    clinical_report: ClinicalReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    /// Textual evidence behind `level`. Never empty in an accepted artifact.
    pub signals: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [&'static str; 3] = ["low", "medium", "high"];
}

/// Whether a formal clinical report is warranted, with its summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalReport {
    pub required: bool,
    pub summary: String,
}

impl ClinicalAnalysisArtifact {
    /// Promote a payload that already passed the contract check.
    pub(crate) fn from_checked(map: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let body = serde_json::from_value(Value::Object(map))?;
        Ok(Self { body })
    }

    pub fn analysis(&self) -> &str {
        &self.body.analysis
    }

    pub fn themes(&self) -> &[String] {
        &self.body.themes
    }

    pub fn signifiers(&self) -> &[String] {
        &self.body.signifiers
    }

    pub fn hypotheses(&self) -> &[String] {
        &self.body.hypotheses
    }

    pub fn questions(&self) -> &[String] {
        &self.body.questions
    }

    pub fn risk_assessment(&self) -> &RiskAssessment {
        &self.body.risk_assessment
    }

    pub fn clinical_report(&self) -> &ClinicalReport {
        &self.body.clinical_report
    }
}
