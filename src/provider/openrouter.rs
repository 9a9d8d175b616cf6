//! OpenRouter chat-completions client used to answer the host's
//! tag-suggestion requests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::http::{bearer_headers, error_from_response, shared_client, trim_trailing_slash};
use super::{TagSuggester, FALLBACK_TAGS};
use crate::config::PipeConfig;
use crate::error::PipeError;
use crate::types::ChatMessage;
use crate::util::timeout::with_timeout;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const REFERER: &str = "https://openwebui.com";
const TITLE: &str = "OpenWebUI Tag Generation";

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Tag suggester backed by an OpenRouter model.
#[derive(Debug, Clone)]
pub struct OpenRouterTagSuggester {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenRouterTagSuggester {
    pub fn new(api_key: String, model: impl Into<String>) -> Self {
        Self::new_with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    pub fn new_with_base_url(
        api_key: String,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            model: model.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_config(config: &PipeConfig) -> Self {
        Self::new_with_base_url(
            config.openrouter_api_key.clone(),
            config.tag_model.clone(),
            config.openrouter_base_url.clone(),
        )
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// First choice's content. `Ok(None)` when the response has no choices.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>, PipeError> {
        let url = format!("{}/chat/completions", trim_trailing_slash(&self.base_url));
        let mut headers = bearer_headers(&self.api_key);
        headers.insert("HTTP-Referer", HeaderValue::from_static(REFERER));
        headers.insert("X-Title", HeaderValue::from_static(TITLE));
        let body = CompletionRequest {
            model: &self.model,
            messages,
            temperature: 0.3,
            max_tokens: 200,
        };

        debug!(model = %self.model, messages = messages.len(), "requesting tag suggestions");
        with_timeout(self.timeout, async {
            let response = shared_client()
                .post(url)
                .headers(headers)
                .json(&body)
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }
            let parsed: CompletionResponse = response.json().await?;
            Ok(parsed.choices.into_iter().next().map(|choice| {
                choice
                    .message
                    .and_then(|m| m.content)
                    .unwrap_or_default()
            }))
        })
        .await
    }
}

#[async_trait]
impl TagSuggester for OpenRouterTagSuggester {
    async fn suggest_tags(&self, messages: &[ChatMessage]) -> String {
        if self.api_key.trim().is_empty() {
            warn!("OPENROUTER_API_KEY not set, using fallback tags");
            return FALLBACK_TAGS.to_string();
        }
        match self.complete(messages).await {
            Ok(Some(content)) => content,
            Ok(None) => {
                warn!("tag suggestion response had no choices, using fallback tags");
                FALLBACK_TAGS.to_string()
            }
            Err(e) => {
                warn!(error = %e, "tag suggestion failed, using fallback tags");
                FALLBACK_TAGS.to_string()
            }
        }
    }
}
