use std::sync::Arc;

use tracing::{error, info};

use crate::application::{CredentialStore, WorkflowController};
use crate::domain::error::Result;
use crate::infrastructure::api_clients::{parse_base_url, GenerationClient, IntegrationClient};
use crate::infrastructure::config::{open_credential_backend, AppConfig};

/// Wires HTTP clients and the credential store into a ready controller.
///
/// Credentials are loaded once here; platforms without a stored record start empty.
pub fn build_controller(config: &AppConfig) -> Result<WorkflowController> {
    let base_url = parse_base_url(&config.api_base_url).map_err(|err| {
        error!(error = %err, "Invalid API base URL");
        err
    })?;
    let timeout = config.request_timeout();

    let generation = Arc::new(GenerationClient::new(base_url.clone(), timeout)?);
    let integration = Arc::new(IntegrationClient::new(base_url.clone(), timeout)?);

    let store = Arc::new(CredentialStore::new(open_credential_backend(config)));
    store.load()?;

    info!(
        api_base_url = %base_url,
        credential_backend = ?config.credential_backend,
        "Workflow controller ready"
    );

    Ok(WorkflowController::new(
        generation,
        integration,
        store,
        config.default_domain.clone(),
    ))
}
