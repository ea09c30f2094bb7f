pub mod generation;
pub mod integration;


use crate::domain::credentials::PlatformCredentials;
use crate::domain::error::{AppError, Result};
use crate::domain::platform::Platform;
use crate::domain::requirement::RequirementFile;
use crate::domain::test_case::TestCase;
use crate::infrastructure::response::extract_error_message;
use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;
use url::Url;

pub use generation::GenerationClient;
pub use integration::IntegrationClient;

/// Remote service turning a requirement into test cases.
#[async_trait]
pub trait GenerationApi {
    async fn generate_from_text(&self, requirement_text: &str, domain: &str) -> Result<Vec<TestCase>>;
    async fn generate_from_file(&self, file: &RequirementFile, domain: &str) -> Result<Vec<TestCase>>;
}

/// Per-platform ALM backends; returns the raw success body for normalization.
#[async_trait]
pub trait IntegrationApi {
    async fn push(
        &self,
        platform: Platform,
        test_cases: &[TestCase],
        credentials: &PlatformCredentials,
    ) -> Result<serde_json::Value>;
}

/// Fails rather than falling back to a client without `timeout`.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// Parses the configured base URL; a trailing slash is added so that relative
/// endpoint paths are appended rather than replacing the last segment.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Url::parse(&with_slash)
        .map_err(|e| AppError::ConfigError(format!("Invalid API base URL '{}': {}", raw, e)))
}

pub fn endpoint(base_url: &Url, path: &str) -> Result<Url> {
    base_url
        .join(path)
        .map_err(|e| AppError::ConfigError(format!("Invalid endpoint '{}': {}", path, e)))
}

/// Converts a send failure into a transport error carrying the generic message.
pub(crate) fn send_failure(err: reqwest::Error, url: &Url, generic: &str) -> AppError {
    warn!(url = %url, error = %err, "Request failed");
    AppError::Transport(generic.to_string())
}

/// Converts a non-2xx response into a transport error, preferring the body's
/// `error`/`detail` text over the generic message.
pub(crate) async fn status_failure(response: reqwest::Response, generic: &str) -> AppError {
    let status = response.status();
    let url = response.url().clone();
    let text = response.text().await.unwrap_or_default();
    let message = extract_error_message(&text);
    warn!(
        url = %url,
        status = %status,
        has_message = message.is_some(),
        "Request returned an error status"
    );
    AppError::Transport(message.unwrap_or_else(|| generic.to_string()))
}

/// Reads a 2xx body as JSON; an unreadable body is a protocol error.
pub(crate) async fn read_json_body(
    response: reqwest::Response,
    generic: &str,
) -> Result<serde_json::Value> {
    let url = response.url().clone();
    response.json::<serde_json::Value>().await.map_err(|e| {
        warn!(url = %url, error = %e, "Response body is not valid JSON");
        AppError::Protocol(generic.to_string())
    })
}
