use crate::application::use_cases::credential_store::CredentialStore;
use crate::application::use_cases::generation::GenerationOrchestrator;
use crate::application::use_cases::input_arbiter::InputArbiter;
use crate::application::use_cases::integration::IntegrationDispatcher;
use crate::domain::error::{AppError, Result};
use crate::domain::platform::Platform;
use crate::domain::requirement::RequirementFile;
use crate::domain::test_case::GenerationResult;
use crate::domain::workflow::{GenerationState, IntegrationOutcome, IntegrationState};
use crate::infrastructure::api_clients::{GenerationApi, IntegrationApi};
use crate::shared::gherkin;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Read-only view of the controller for whatever renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowSnapshot {
    pub input_kind: &'static str,
    pub has_requirement: bool,
    pub domain: String,
    pub selected_platform: Platform,
    pub credentials_valid: bool,
    pub generation: GenerationState,
    pub integration: IntegrationState,
}

/// Compact per-case line of a result listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCaseSummary {
    pub test_id: String,
    pub feature: String,
    pub scenario: String,
}

struct Selection {
    arbiter: InputArbiter,
    domain: String,
    platform: Platform,
}

/// Composes input, generation, credentials and integration into one workflow.
pub struct WorkflowController {
    selection: Mutex<Selection>,
    generation: GenerationOrchestrator,
    integration: IntegrationDispatcher,
    credentials: Arc<CredentialStore>,
}

impl WorkflowController {
    pub fn new(
        generation_api: Arc<dyn GenerationApi + Send + Sync>,
        integration_api: Arc<dyn IntegrationApi + Send + Sync>,
        credentials: Arc<CredentialStore>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            selection: Mutex::new(Selection {
                arbiter: InputArbiter::new(),
                domain: domain.into(),
                platform: Platform::default(),
            }),
            generation: GenerationOrchestrator::new(generation_api),
            integration: IntegrationDispatcher::new(integration_api),
            credentials,
        }
    }

    fn selection(&self) -> MutexGuard<'_, Selection> {
        self.selection.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn input_changed(&self) {
        self.generation.reset();
        self.integration.reset();
    }

    pub fn set_file(&self, file: RequirementFile) {
        self.selection().arbiter.set_file(file);
        self.input_changed();
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.selection().arbiter.set_text(text);
        self.input_changed();
    }

    pub fn clear_input(&self) {
        self.selection().arbiter.clear();
        self.input_changed();
    }

    pub fn set_domain(&self, domain: impl Into<String>) {
        self.selection().domain = domain.into();
    }

    /// Changes which credentials and endpoint the next dispatch uses; nothing else.
    pub fn select_platform(&self, platform: Platform) {
        self.selection().platform = platform;
        debug!(platform = %platform, "Platform selected");
    }

    pub fn selected_platform(&self) -> Platform {
        self.selection().platform
    }

    /// Edits one field of the selected platform and returns its new validity.
    pub fn update_credential(&self, field: &str, value: &str) -> Result<bool> {
        let platform = self.selected_platform();
        self.credentials.update(platform, field, value)?;
        Ok(self.credentials.is_valid(platform))
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub async fn generate(&self) -> Result<GenerationResult> {
        let (input, domain) = {
            let selection = self.selection();
            (selection.arbiter.input().clone(), selection.domain.clone())
        };
        if input.has_requirement() && !self.generation.is_pending() {
            self.integration.reset();
        }
        // The selection lock is taken inside the generation state lock here;
        // no other path nests them.
        let is_current = |digest: &str| self.selection().arbiter.input().digest() == digest;
        self.generation.submit_checked(&input, &domain, &is_current).await
    }

    pub async fn integrate(&self) -> Result<IntegrationOutcome> {
        let platform = self.selected_platform();
        let result = self
            .generation
            .result()
            .filter(|result| !result.is_empty())
            .ok_or(AppError::NoResult)?;

        let credentials = self.credentials.get(platform)?;
        if !credentials.is_valid_for(platform) {
            return Err(AppError::InvalidCredentials(platform));
        }

        self.integration
            .dispatch(platform, &result.test_cases, &credentials)
            .await
    }

    pub fn result(&self) -> Option<GenerationResult> {
        self.generation.result()
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        let (input_kind, has_requirement, domain, platform) = {
            let selection = self.selection();
            (
                selection.arbiter.input().kind(),
                selection.arbiter.has_requirement(),
                selection.domain.clone(),
                selection.platform,
            )
        };
        WorkflowSnapshot {
            input_kind,
            has_requirement,
            domain,
            selected_platform: platform,
            credentials_valid: self.credentials.is_valid(platform),
            generation: self.generation.state(),
            integration: self.integration.state(),
        }
    }

    pub fn result_summaries(&self) -> Vec<TestCaseSummary> {
        self.generation
            .result()
            .map(|result| {
                result
                    .test_cases
                    .iter()
                    .map(|case| {
                        let meta = gherkin::extract(&case.gherkin_feature);
                        TestCaseSummary {
                            test_id: case.test_id.clone(),
                            feature: meta.feature,
                            scenario: meta.scenario,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{FakeGenerationApi, FakeIntegrationApi};
    use crate::infrastructure::storage::MemoryBackend;
    use serde_json::json;

    struct Harness {
        generation: Arc<FakeGenerationApi>,
        integration: Arc<FakeIntegrationApi>,
        controller: WorkflowController,
    }

    fn harness() -> Harness {
        let generation = Arc::new(FakeGenerationApi::new());
        let integration = Arc::new(FakeIntegrationApi::new());
        let store = Arc::new(CredentialStore::new(Arc::new(MemoryBackend::new())));
        store.load().unwrap();
        let controller =
            WorkflowController::new(generation.clone(), integration.clone(), store, "Healthcare");
        Harness {
            generation,
            integration,
            controller,
        }
    }

    fn fill_github(controller: &WorkflowController) {
        controller.select_platform(Platform::GitHub);
        controller.update_credential("token", "ghp_x").unwrap();
        controller.update_credential("owner", "acme").unwrap();
        controller.update_credential("repo", "portal").unwrap();
    }

    #[tokio::test]
    async fn test_generate_without_input_is_rejected_locally() {
        let h = harness();
        let err = h.controller.generate().await.unwrap_err();
        assert_eq!(err, AppError::EmptyInput);
        assert_eq!(h.generation.total_calls(), 0);
        assert_eq!(h.controller.snapshot().generation, GenerationState::Idle);
    }

    #[tokio::test]
    async fn test_summaries_come_from_gherkin_text() {
        let h = harness();
        h.controller.set_text("Lock accounts after three failures");
        h.controller.generate().await.unwrap();

        let summaries = h.controller.result_summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].feature, "Account lockout");
        assert_eq!(summaries[0].scenario, "Three failed logins");
        assert_eq!(summaries[1].scenario, "Record access to <record>");
    }

    #[tokio::test]
    async fn test_switching_platform_keeps_result() {
        let h = harness();
        h.controller.set_text("req");
        h.controller.generate().await.unwrap();

        h.controller.select_platform(Platform::AzureDevOps);
        h.controller.select_platform(Platform::GitLab);

        assert!(h.controller.result().is_some());
        assert_eq!(h.controller.snapshot().selected_platform, Platform::GitLab);
    }

    #[tokio::test]
    async fn test_input_change_clears_result_and_outcome() {
        let h = harness();
        fill_github(&h.controller);
        h.controller.set_text("req");
        h.controller.generate().await.unwrap();
        h.controller.integrate().await.unwrap();
        assert!(matches!(
            h.controller.snapshot().integration,
            IntegrationState::IntegrationSucceeded(_)
        ));

        h.controller
            .set_file(RequirementFile::new("srs.txt", b"new requirement".to_vec()));

        let snapshot = h.controller.snapshot();
        assert_eq!(snapshot.input_kind, "file");
        assert_eq!(snapshot.generation, GenerationState::Idle);
        assert_eq!(snapshot.integration, IntegrationState::Idle);
        assert!(h.controller.result_summaries().is_empty());
    }

    #[tokio::test]
    async fn test_input_change_mid_generation_drops_stale_result() {
        let generation = Arc::new(FakeGenerationApi::gated());
        let store = Arc::new(CredentialStore::new(Arc::new(MemoryBackend::new())));
        store.load().unwrap();
        let controller = Arc::new(WorkflowController::new(
            generation.clone(),
            Arc::new(FakeIntegrationApi::new()),
            store,
            "Healthcare",
        ));

        controller.set_text("requirement A");
        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.generate().await })
        };
        while !controller.snapshot().generation.is_pending() {
            tokio::task::yield_now().await;
        }

        controller.set_text("requirement B");
        generation.release();
        let err = pending.await.unwrap().unwrap_err();

        assert_eq!(err, AppError::InputChanged);
        assert_eq!(controller.snapshot().generation, GenerationState::Idle);
        assert!(controller.result().is_none());
        assert!(controller.result_summaries().is_empty());
        assert_eq!(generation.text_calls(), 1);
    }

    #[tokio::test]
    async fn test_new_generation_clears_previous_outcome() {
        let h = harness();
        fill_github(&h.controller);
        h.controller.set_text("req");
        h.controller.generate().await.unwrap();
        h.controller.integrate().await.unwrap();

        h.controller.generate().await.unwrap();
        assert_eq!(h.controller.snapshot().integration, IntegrationState::Idle);
    }

    #[tokio::test]
    async fn test_integrate_without_result_makes_no_call() {
        let h = harness();
        fill_github(&h.controller);
        let err = h.controller.integrate().await.unwrap_err();
        assert_eq!(err, AppError::NoResult);
        assert_eq!(h.integration.calls(), 0);
    }

    #[tokio::test]
    async fn test_integrate_with_empty_result_makes_no_call() {
        let h = harness();
        fill_github(&h.controller);
        h.generation.push_response(Ok(Vec::new()));
        h.controller.set_text("req");
        let result = h.controller.generate().await.unwrap();
        assert!(result.is_empty());

        let err = h.controller.integrate().await.unwrap_err();
        assert_eq!(err, AppError::NoResult);
        assert_eq!(h.integration.calls(), 0);
    }

    #[tokio::test]
    async fn test_incomplete_credentials_make_no_call() {
        let h = harness();
        h.controller.select_platform(Platform::Jira);
        h.controller.update_credential("server", "https://acme.atlassian.net").unwrap();
        h.controller.update_credential("user", "qa").unwrap();
        h.controller.update_credential("apiToken", "t").unwrap();
        let valid = h.controller.update_credential("projectKey", "   ").unwrap();
        assert!(!valid);

        h.controller.set_text("req");
        h.controller.generate().await.unwrap();
        let err = h.controller.integrate().await.unwrap_err();
        assert_eq!(err, AppError::InvalidCredentials(Platform::Jira));
        assert_eq!(h.integration.calls(), 0);

        assert!(h.controller.update_credential("projectKey", "MED").unwrap());
        assert!(h.controller.snapshot().credentials_valid);
    }

    #[tokio::test]
    async fn test_dispatch_uses_selected_platform_and_can_repeat() {
        let h = harness();
        fill_github(&h.controller);
        h.controller.set_text("req");
        h.controller.generate().await.unwrap();

        h.integration
            .push_response(Err(AppError::Transport("Bad credentials".to_string())));
        let err = h.controller.integrate().await.unwrap_err();
        assert_eq!(err.display_message(), "Bad credentials");

        h.integration
            .push_response(Ok(json!({"message": "ok", "issues": ["12", "13"]})));
        let outcome = h.controller.integrate().await.unwrap();
        assert_eq!(outcome.message, "ok - Issues: #12, #13");
        assert_eq!(h.generation.text_calls(), 1);
        assert!(h
            .integration
            .pushed()
            .iter()
            .all(|(platform, count, _)| *platform == Platform::GitHub && *count == 2));
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_integration_untouched() {
        let h = harness();
        fill_github(&h.controller);
        h.controller.set_text("req");
        h.controller.generate().await.unwrap();
        h.integration
            .push_response(Err(AppError::Transport("Repository not found".to_string())));
        let _ = h.controller.integrate().await;

        h.generation
            .push_response(Err(AppError::Transport("Model overloaded".to_string())));
        h.controller.generate().await.unwrap_err();

        let snapshot = h.controller.snapshot();
        assert_eq!(
            snapshot.generation,
            GenerationState::GenerationFailed("Model overloaded".to_string())
        );
        assert_eq!(snapshot.integration, IntegrationState::Idle);
    }
}
