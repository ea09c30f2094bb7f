use crate::domain::platform::Platform;
use crate::domain::test_case::GenerationResult;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum GenerationState {
    #[default]
    Idle,
    Generating,
    Results(GenerationResult),
    GenerationFailed(String),
}

impl GenerationState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Generating)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Generating => "generating",
            Self::Results(_) => "results",
            Self::GenerationFailed(_) => "generation_failed",
        }
    }
}

/// Normalized success of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrationOutcome {
    pub platform: Platform,
    pub server_message: String,
    pub identifiers: Vec<String>,
    /// `{server message} - {rendered identifier list}`
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum IntegrationState {
    #[default]
    Idle,
    Integrating(Platform),
    IntegrationSucceeded(IntegrationOutcome),
    IntegrationFailed(String),
}

impl IntegrationState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Integrating(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Integrating(_) => "integrating",
            Self::IntegrationSucceeded(_) => "integration_succeeded",
            Self::IntegrationFailed(_) => "integration_failed",
        }
    }
}
