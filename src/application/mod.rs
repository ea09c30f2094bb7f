pub mod use_cases;

pub use use_cases::credential_store::CredentialStore;
pub use use_cases::export::ExportFormat;
pub use use_cases::generation::GenerationOrchestrator;
pub use use_cases::input_arbiter::InputArbiter;
pub use use_cases::integration::IntegrationDispatcher;
pub use use_cases::workflow::{TestCaseSummary, WorkflowController, WorkflowSnapshot};
