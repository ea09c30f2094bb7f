use crate::domain::error::{AppError, Result};
use crate::domain::requirement::RequirementInput;
use crate::domain::test_case::GenerationResult;
use crate::domain::workflow::GenerationState;
use crate::infrastructure::api_clients::GenerationApi;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};
use uuid::Uuid;

const INTERRUPTED: &str = "Generation was interrupted before the service answered.";

/// Drives `Idle -> Generating -> Results | GenerationFailed`.
///
/// At most one request is in flight; a second `submit` while `Generating`
/// is rejected rather than raced.
pub struct GenerationOrchestrator {
    api: Arc<dyn GenerationApi + Send + Sync>,
    state: Mutex<GenerationState>,
}

/// Leaves `Generating` if the submitting future is dropped mid-request.
struct InFlight<'a> {
    state: &'a Mutex<GenerationState>,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            *state = GenerationState::GenerationFailed(INTERRUPTED.to_string());
        }
    }
}

impl GenerationOrchestrator {
    pub fn new(api: Arc<dyn GenerationApi + Send + Sync>) -> Self {
        Self {
            api,
            state: Mutex::new(GenerationState::Idle),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GenerationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> GenerationState {
        self.lock().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().is_pending()
    }

    /// The stored result, only while in `Results`.
    pub fn result(&self) -> Option<GenerationResult> {
        match &*self.lock() {
            GenerationState::Results(result) => Some(result.clone()),
            _ => None,
        }
    }

    /// Back to `Idle`, unless a request is pending. Returns whether it reset.
    pub fn reset(&self) -> bool {
        let mut state = self.lock();
        if state.is_pending() {
            return false;
        }
        *state = GenerationState::Idle;
        true
    }

    pub async fn submit(&self, input: &RequirementInput, domain: &str) -> Result<GenerationResult> {
        self.submit_checked(input, domain, &|_: &str| true).await
    }

    /// Like [`submit`](Self::submit), but asks `is_current` with the sent
    /// input's digest before settling. A stale answer is dropped and the
    /// state returns to `Idle` with [`AppError::InputChanged`].
    pub async fn submit_checked(
        &self,
        input: &RequirementInput,
        domain: &str,
        is_current: &(dyn Fn(&str) -> bool + Send + Sync),
    ) -> Result<GenerationResult> {
        if !input.has_requirement() {
            return Err(AppError::EmptyInput);
        }

        {
            let mut state = self.lock();
            if state.is_pending() {
                return Err(AppError::AlreadyInProgress("generation".to_string()));
            }
            *state = GenerationState::Generating;
        }
        let mut in_flight = InFlight {
            state: &self.state,
            settled: false,
        };

        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, input = input.kind(), domain = %domain, "Generation started");

        let outcome = match input {
            RequirementInput::Text(text) => self.api.generate_from_text(text, domain).await,
            RequirementInput::File(file) => self.api.generate_from_file(file, domain).await,
            RequirementInput::None => Err(AppError::EmptyInput),
        };

        let digest = input.digest();
        let mut state = self.lock();
        in_flight.settled = true;
        if !is_current(&digest) {
            info!(run_id = %run_id, "Requirement changed during generation; answer dropped");
            *state = GenerationState::Idle;
            return Err(AppError::InputChanged);
        }
        match outcome {
            Ok(test_cases) => {
                let result = GenerationResult {
                    test_cases,
                    requirement_digest: digest,
                };
                info!(run_id = %run_id, test_cases = result.len(), "Generation succeeded");
                *state = GenerationState::Results(result.clone());
                Ok(result)
            }
            Err(err) => {
                let message = err.display_message();
                warn!(run_id = %run_id, error = %err, "Generation failed");
                *state = GenerationState::GenerationFailed(message);
                Err(err)
            }
        }
    }
}
