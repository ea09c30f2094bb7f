//! In-process fakes for the remote services, shared by use-case tests.

use crate::domain::credentials::PlatformCredentials;
use crate::domain::error::Result;
use crate::domain::platform::Platform;
use crate::domain::requirement::RequirementFile;
use crate::domain::test_case::{ComplianceAssessment, ComplianceStatus, RiskAndPriority, TestCase};
use crate::infrastructure::api_clients::{GenerationApi, IntegrationApi};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

pub fn sample_cases() -> Vec<TestCase> {
    let mut lockout = TestCase::new(
        "TC-001",
        "Feature: Account lockout\nScenario: Three failed logins\n  Given a registered clinician",
    );
    lockout.requirement_source = "REQ-7 Lock the account after three failed attempts".to_string();
    lockout.compliance_tags = vec!["HIPAA".to_string(), "IEC 62304".to_string()];
    lockout.compliance_assessment = Some(ComplianceAssessment {
        status: ComplianceStatus::compliant(),
        reasoning: "Access control is enforced".to_string(),
    });
    lockout.risk_and_priority = Some(RiskAndPriority {
        score: 8,
        reasoning: "Patient data exposure".to_string(),
    });

    let mut audit = TestCase::new(
        "TC-002",
        "Feature: Audit trail\nScenario Outline: Record access to <record>",
    );
    audit.requirement_source = "REQ-9 Record every chart access".to_string();
    audit.compliance_tags = vec!["HIPAA".to_string()];
    audit.compliance_assessment = Some(ComplianceAssessment {
        status: ComplianceStatus::non_compliant(),
        reasoning: "Retention period is not stated".to_string(),
    });

    vec![lockout, audit]
}

/// Blocks each call on `release` when built with [`FakeGenerationApi::gated`].
#[derive(Default)]
struct Gate {
    enabled: bool,
    notify: Notify,
}

impl Gate {
    async fn pass(&self) {
        if self.enabled {
            self.notify.notified().await;
        }
    }
}

#[derive(Default)]
pub struct FakeGenerationApi {
    text_calls: AtomicUsize,
    file_calls: AtomicUsize,
    last_domain: Mutex<Option<String>>,
    responses: Mutex<VecDeque<Result<Vec<TestCase>>>>,
    gate: Gate,
}

impl FakeGenerationApi {
    /// Answers [`sample_cases`] unless a scripted response is queued.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Gate {
                enabled: true,
                notify: Notify::new(),
            },
            ..Self::default()
        }
    }

    pub fn release(&self) {
        self.gate.notify.notify_one();
    }

    pub fn push_response(&self, response: Result<Vec<TestCase>>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub fn file_calls(&self) -> usize {
        self.file_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.text_calls() + self.file_calls()
    }

    pub fn last_domain(&self) -> Option<String> {
        self.last_domain.lock().unwrap().clone()
    }

    async fn answer(&self, domain: &str) -> Result<Vec<TestCase>> {
        *self.last_domain.lock().unwrap() = Some(domain.to_string());
        self.gate.pass().await;
        let scripted = self.responses.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(sample_cases()))
    }
}

#[async_trait]
impl GenerationApi for FakeGenerationApi {
    async fn generate_from_text(&self, _requirement_text: &str, domain: &str) -> Result<Vec<TestCase>> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.answer(domain).await
    }

    async fn generate_from_file(&self, _file: &RequirementFile, domain: &str) -> Result<Vec<TestCase>> {
        self.file_calls.fetch_add(1, Ordering::SeqCst);
        self.answer(domain).await
    }
}

#[derive(Default)]
pub struct FakeIntegrationApi {
    calls: AtomicUsize,
    pushed: Mutex<Vec<(Platform, usize, PlatformCredentials)>>,
    responses: Mutex<VecDeque<Result<Value>>>,
    gate: Gate,
}

impl FakeIntegrationApi {
    /// Answers `{"message": "ok", <field>: []}` unless a scripted response is queued.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Gate {
                enabled: true,
                notify: Notify::new(),
            },
            ..Self::default()
        }
    }

    pub fn release(&self) {
        self.gate.notify.notify_one();
    }

    pub fn push_response(&self, response: Result<Value>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(platform, number of test cases, credentials)` per call.
    pub fn pushed(&self) -> Vec<(Platform, usize, PlatformCredentials)> {
        self.pushed.lock().unwrap().clone()
    }
}

#[async_trait]
impl IntegrationApi for FakeIntegrationApi {
    async fn push(
        &self,
        platform: Platform,
        test_cases: &[TestCase],
        credentials: &PlatformCredentials,
    ) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pushed
            .lock()
            .unwrap()
            .push((platform, test_cases.len(), credentials.clone()));
        self.gate.pass().await;
        let scripted = self.responses.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            let mut body = serde_json::Map::new();
            body.insert("message".to_string(), Value::from("ok"));
            body.insert(platform.response_shape().field.to_string(), Value::Array(Vec::new()));
            Ok(Value::Object(body))
        })
    }
}
