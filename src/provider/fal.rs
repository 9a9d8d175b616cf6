//! fal.ai synchronous inference backend (`POST https://fal.run/<path>`).

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::http::{error_from_response, join_url, key_headers, shared_client};
use super::{Arguments, ImageBackend};
use crate::config::PipeConfig;
use crate::error::PipeError;
use crate::types::GenerationOutput;
use crate::util::retry::RetryPolicy;
use crate::util::timeout::with_timeout;

pub const DEFAULT_BASE_URL: &str = "https://fal.run";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// fal.ai image backend.
#[derive(Debug, Clone)]
pub struct FalBackend {
    api_key: String,
    base_url: String,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl FalBackend {
    pub fn new(api_key: String) -> Self {
        Self::new_with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn new_with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Backend using the key, base URL, timeout and retry settings of `config`.
    pub fn from_config(config: &PipeConfig) -> Self {
        Self::new_with_base_url(config.fal_key.clone(), config.fal_base_url.clone())
            .with_timeout(config.request_timeout())
            .with_retry_policy(config.retry_policy())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    fn validate_inputs(&self, path: &str) -> Result<(), PipeError> {
        if self.api_key.trim().is_empty() {
            return Err(PipeError::Authentication(
                "Missing fal.ai API key".to_string(),
            ));
        }
        if path.trim().is_empty() {
            return Err(PipeError::InvalidArgument(
                "Model path cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    async fn generate_once(
        &self,
        url: &str,
        arguments: &Arguments,
    ) -> Result<GenerationOutput, PipeError> {
        with_timeout(self.timeout, async {
            let response = shared_client()
                .post(url)
                .headers(key_headers(&self.api_key))
                .json(arguments)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }

            let raw: serde_json::Value = response.json().await?;
            GenerationOutput::from_response(raw)
        })
        .await
    }
}

#[async_trait]
impl ImageBackend for FalBackend {
    fn provider_name(&self) -> &str {
        "fal"
    }

    async fn generate(
        &self,
        path: &str,
        arguments: &Arguments,
    ) -> Result<GenerationOutput, PipeError> {
        self.validate_inputs(path)?;
        let url = join_url(&self.base_url, path);
        debug!(%url, arguments = arguments.len(), "fal generate");

        self.retry_policy
            .execute("fal.generate", || self.generate_once(&url, arguments))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let backend = FalBackend::new_with_base_url(String::new(), "http://127.0.0.1:9");
        let err = backend
            .generate("fal-ai/flux-2", &Arguments::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PipeError::Authentication(_)));
    }

    #[tokio::test]
    async fn empty_path_is_invalid() {
        let backend = FalBackend::new_with_base_url("k".to_string(), "http://127.0.0.1:9");
        let err = backend.generate("  ", &Arguments::new()).await.unwrap_err();
        assert!(matches!(err, PipeError::InvalidArgument(_)));
    }

    #[test]
    fn from_config_copies_settings() {
        let config = PipeConfig::builder()
            .fal_key("k")
            .request_timeout_secs(5)
            .max_attempts(3)
            .build();
        let backend = FalBackend::from_config(&config);
        assert_eq!(backend.timeout, Duration::from_secs(5));
        assert_eq!(backend.retry_policy.max_attempts, 3);
        assert_eq!(backend.base_url, DEFAULT_BASE_URL);
    }
}
