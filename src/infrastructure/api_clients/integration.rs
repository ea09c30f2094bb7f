use super::{
    build_http_client, endpoint, read_json_body, send_failure, status_failure, IntegrationApi,
};
use crate::domain::credentials::PlatformCredentials;
use crate::domain::error::Result;
use crate::domain::platform::Platform;
use crate::domain::test_case::TestCase;
use crate::infrastructure::response::generic_integration_error;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Serialize)]
struct IntegrationPayload<'a> {
    test_cases: &'a [TestCase],
    credentials: &'a PlatformCredentials,
}

pub struct IntegrationClient {
    client: reqwest::Client,
    base_url: Url,
}

impl IntegrationClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url,
        })
    }
}

#[async_trait]
impl IntegrationApi for IntegrationClient {
    async fn push(
        &self,
        platform: Platform,
        test_cases: &[TestCase],
        credentials: &PlatformCredentials,
    ) -> Result<serde_json::Value> {
        let url = endpoint(&self.base_url, &platform.endpoint_path())?;
        let generic = generic_integration_error(platform);
        debug!(url = %url, platform = %platform, test_cases = test_cases.len(), "Posting test cases");

        let payload = IntegrationPayload {
            test_cases,
            credentials,
        };

        let response = self
            .client
            .post(url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| send_failure(e, &url, &generic))?;

        if !response.status().is_success() {
            return Err(status_failure(response, &generic).await);
        }

        read_json_body(response, &generic).await
    }
}
