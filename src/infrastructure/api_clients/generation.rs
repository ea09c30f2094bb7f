use super::{
    build_http_client, endpoint, read_json_body, send_failure, status_failure, GenerationApi,
};
use crate::domain::error::{AppError, Result};
use crate::domain::requirement::RequirementFile;
use crate::domain::test_case::TestCase;
use crate::infrastructure::response::{extract_error_field, GENERIC_GENERATION_ERROR};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const TEXT_ENDPOINT: &str = "api/generate-from-text";
const FILE_ENDPOINT: &str = "api/generate";

#[derive(Serialize)]
struct TextGenerationRequest<'a> {
    requirement_text: &'a str,
    domain: &'a str,
}

pub struct GenerationClient {
    client: reqwest::Client,
    base_url: Url,
}

impl GenerationClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url,
        })
    }

    async fn read_test_cases(response: reqwest::Response) -> Result<Vec<TestCase>> {
        if !response.status().is_success() {
            return Err(status_failure(response, GENERIC_GENERATION_ERROR).await);
        }

        let json = read_json_body(response, GENERIC_GENERATION_ERROR).await?;
        parse_test_cases(json)
    }
}

/// Reads `{test_cases: [...]}`; a body without the list is a protocol error.
fn parse_test_cases(mut json: Value) -> Result<Vec<TestCase>> {
    let Some(list) = json.get_mut("test_cases").map(Value::take) else {
        let message =
            extract_error_field(&json).unwrap_or_else(|| GENERIC_GENERATION_ERROR.to_string());
        warn!("Generation response has no test_cases list");
        return Err(AppError::Protocol(message));
    };

    serde_json::from_value::<Vec<TestCase>>(list).map_err(|e| {
        warn!(error = %e, "Generation response has malformed test cases");
        AppError::Protocol(GENERIC_GENERATION_ERROR.to_string())
    })
}

#[async_trait]
impl GenerationApi for GenerationClient {
    async fn generate_from_text(&self, requirement_text: &str, domain: &str) -> Result<Vec<TestCase>> {
        let url = endpoint(&self.base_url, TEXT_ENDPOINT)?;
        debug!(url = %url, chars = requirement_text.len(), "Posting requirement text");

        let body = TextGenerationRequest {
            requirement_text,
            domain,
        };

        let response = self
            .client
            .post(url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| send_failure(e, &url, GENERIC_GENERATION_ERROR))?;

        Self::read_test_cases(response).await
    }

    async fn generate_from_file(&self, file: &RequirementFile, domain: &str) -> Result<Vec<TestCase>> {
        let url = endpoint(&self.base_url, FILE_ENDPOINT)?;
        debug!(url = %url, file = %file.name, bytes = file.bytes.len(), "Uploading requirement file");

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(file.mime_type())
            .map_err(|_| AppError::ValidationError("Invalid requirement file content type.".to_string()))?;
        let form = Form::new()
            .part("requirement_file", part)
            .text("domain", domain.to_string());

        let response = self
            .client
            .post(url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| send_failure(e, &url, GENERIC_GENERATION_ERROR))?;

        Self::read_test_cases(response).await
    }
}
