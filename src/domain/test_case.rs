use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How a compliance status reads, whatever spelling the service used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceKind {
    Compliant,
    NonCompliant,
    Other,
}

/// Compliance status exactly as the service spelled it.
///
/// Classification ignores case and punctuation, so `NonCompliant`,
/// `non-compliant` and `Non Compliant` all read as [`ComplianceKind::NonCompliant`],
/// while serialization writes the original text back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplianceStatus(String);

impl ComplianceStatus {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn compliant() -> Self {
        Self::new("Compliant")
    }

    pub fn non_compliant() -> Self {
        Self::new("Non-Compliant")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> ComplianceKind {
        let normalized: String = self
            .0
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "compliant" => ComplianceKind::Compliant,
            "noncompliant" => ComplianceKind::NonCompliant,
            _ => ComplianceKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceAssessment {
    pub status: ComplianceStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAndPriority {
    /// 0 (negligible) to 10 (critical).
    pub score: u8,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reasoning: String,
}

/// One generated test case, as returned by the generation service.
///
/// Fields the client does not interpret are kept in `extra` so the record is
/// forwarded unchanged in integration payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub test_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub requirement_source: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub gherkin_feature: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compliance_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_assessment: Option<ComplianceAssessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_and_priority: Option<RiskAndPriority>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TestCase {
    pub fn new(test_id: impl Into<String>, gherkin_feature: impl Into<String>) -> Self {
        Self {
            test_id: test_id.into(),
            requirement_source: String::new(),
            gherkin_feature: gherkin_feature.into(),
            compliance_tags: Vec::new(),
            compliance_assessment: None,
            risk_and_priority: None,
            extra: Map::new(),
        }
    }

    pub fn is_non_compliant(&self) -> bool {
        matches!(
            self.compliance_assessment.as_ref().map(|a| a.status.kind()),
            Some(ComplianceKind::NonCompliant)
        )
    }
}

/// Ordered test cases of one successful generation; order is the server's.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerationResult {
    pub test_cases: Vec<TestCase>,
    /// SHA-256 of the requirement the cases were generated from.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub requirement_digest: String,
}

impl GenerationResult {
    pub fn is_empty(&self) -> bool {
        self.test_cases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.test_cases.len()
    }
}
