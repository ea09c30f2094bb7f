use crate::domain::credentials::PlatformCredentials;
use crate::domain::error::{AppError, Result};
use crate::domain::platform::Platform;
use crate::domain::test_case::TestCase;
use crate::domain::workflow::{IntegrationOutcome, IntegrationState};
use crate::infrastructure::api_clients::IntegrationApi;
use crate::infrastructure::response::normalize_integration_response;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

const INTERRUPTED: &str = "Sending was interrupted before the platform answered.";

/// Pushes a generated result to one ALM platform at a time.
pub struct IntegrationDispatcher {
    api: Arc<dyn IntegrationApi + Send + Sync>,
    state: Mutex<IntegrationState>,
}

struct InFlight<'a> {
    state: &'a Mutex<IntegrationState>,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            *state = IntegrationState::IntegrationFailed(INTERRUPTED.to_string());
        }
    }
}

impl IntegrationDispatcher {
    pub fn new(api: Arc<dyn IntegrationApi + Send + Sync>) -> Self {
        Self {
            api,
            state: Mutex::new(IntegrationState::Idle),
        }
    }

    fn lock(&self) -> MutexGuard<'_, IntegrationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> IntegrationState {
        self.lock().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().is_pending()
    }

    pub fn reset(&self) -> bool {
        let mut state = self.lock();
        if state.is_pending() {
            return false;
        }
        *state = IntegrationState::Idle;
        true
    }

    /// Sends `test_cases` with `credentials` to `platform`.
    ///
    /// Credentials are checked by the caller; this only refuses an empty
    /// result, before any request is made.
    pub async fn dispatch(
        &self,
        platform: Platform,
        test_cases: &[TestCase],
        credentials: &PlatformCredentials,
    ) -> Result<IntegrationOutcome> {
        if test_cases.is_empty() {
            return Err(AppError::NoResult);
        }

        {
            let mut state = self.lock();
            if state.is_pending() {
                return Err(AppError::AlreadyInProgress("integration".to_string()));
            }
            *state = IntegrationState::Integrating(platform);
        }
        let mut in_flight = InFlight {
            state: &self.state,
            settled: false,
        };

        info!(platform = %platform, test_cases = test_cases.len(), "Sending test cases");
        let outcome = match self.api.push(platform, test_cases, credentials).await {
            Ok(body) => normalize_integration_response(platform, &body),
            Err(err) => Err(err),
        };

        let mut state = self.lock();
        in_flight.settled = true;
        match outcome {
            Ok(outcome) => {
                info!(
                    platform = %platform,
                    created = outcome.identifiers.len(),
                    "Test cases sent"
                );
                *state = IntegrationState::IntegrationSucceeded(outcome.clone());
                Ok(outcome)
            }
            Err(err) => {
                warn!(platform = %platform, error = %err, "Sending test cases failed");
                *state = IntegrationState::IntegrationFailed(err.display_message());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{sample_cases, FakeIntegrationApi};
    use serde_json::json;

    fn github_credentials() -> PlatformCredentials {
        let mut credentials = PlatformCredentials::empty_for(Platform::GitHub);
        credentials.set("token", "ghp_x");
        credentials.set("owner", "acme");
        credentials.set("repo", "portal");
        credentials
    }

    #[tokio::test]
    async fn test_empty_result_never_calls_backend() {
        let api = Arc::new(FakeIntegrationApi::new());
        let dispatcher = IntegrationDispatcher::new(api.clone());

        let err = dispatcher
            .dispatch(Platform::GitHub, &[], &github_credentials())
            .await
            .unwrap_err();

        assert_eq!(err, AppError::NoResult);
        assert_eq!(api.calls(), 0);
        assert_eq!(dispatcher.state(), IntegrationState::Idle);
    }

    #[tokio::test]
    async fn test_github_success_message() {
        let api = Arc::new(FakeIntegrationApi::new());
        api.push_response(Ok(json!({"message": "ok", "issues": [12, 13]})));
        let dispatcher = IntegrationDispatcher::new(api.clone());

        let outcome = dispatcher
            .dispatch(Platform::GitHub, &sample_cases(), &github_credentials())
            .await
            .unwrap();

        assert_eq!(outcome.message, "ok - Issues: #12, #13");
        assert_eq!(outcome.identifiers, vec!["12", "13"]);
        let pushed = api.pushed();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].0, Platform::GitHub);
        assert_eq!(pushed[0].1, 2);
        assert_eq!(pushed[0].2.get("repo"), Some("portal"));
        assert!(matches!(
            dispatcher.state(),
            IntegrationState::IntegrationSucceeded(_)
        ));
    }

    #[tokio::test]
    async fn test_azure_devops_success_message() {
        let api = Arc::new(FakeIntegrationApi::new());
        api.push_response(Ok(json!({"message": "ok", "items": [5]})));
        let dispatcher = IntegrationDispatcher::new(api);

        let outcome = dispatcher
            .dispatch(
                Platform::AzureDevOps,
                &sample_cases(),
                &PlatformCredentials::empty_for(Platform::AzureDevOps),
            )
            .await
            .unwrap();

        assert_eq!(outcome.message, "ok - Work Items: 5");
    }

    #[tokio::test]
    async fn test_backend_error_is_shown_verbatim() {
        let api = Arc::new(FakeIntegrationApi::new());
        api.push_response(Err(AppError::Transport("Bad credentials".to_string())));
        let dispatcher = IntegrationDispatcher::new(api);

        let err = dispatcher
            .dispatch(Platform::GitHub, &sample_cases(), &github_credentials())
            .await
            .unwrap_err();

        assert_eq!(err.display_message(), "Bad credentials");
        assert_eq!(
            dispatcher.state(),
            IntegrationState::IntegrationFailed("Bad credentials".to_string())
        );
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_protocol_error() {
        let api = Arc::new(FakeIntegrationApi::new());
        api.push_response(Ok(json!({"message": "ok"})));
        let dispatcher = IntegrationDispatcher::new(api);

        let err = dispatcher
            .dispatch(Platform::GitLab, &sample_cases(), &PlatformCredentials::default())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AppError::Protocol("Failed to send test cases to GitLab.".to_string())
        );
    }

    #[tokio::test]
    async fn test_concurrent_dispatch_is_rejected() {
        let api = Arc::new(FakeIntegrationApi::gated());
        let dispatcher = Arc::new(IntegrationDispatcher::new(api.clone()));

        let first = {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                dispatcher
                    .dispatch(Platform::GitHub, &sample_cases(), &github_credentials())
                    .await
            })
        };
        while !dispatcher.is_pending() {
            tokio::task::yield_now().await;
        }
        assert_eq!(
            dispatcher.state(),
            IntegrationState::Integrating(Platform::GitHub)
        );

        let err = dispatcher
            .dispatch(Platform::Jira, &sample_cases(), &PlatformCredentials::default())
            .await
            .unwrap_err();
        assert_eq!(err, AppError::AlreadyInProgress("integration".to_string()));
        assert!(!dispatcher.reset());

        api.release();
        first.await.unwrap().unwrap();
        assert_eq!(api.calls(), 1);
    }
}
