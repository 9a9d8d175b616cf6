//! Shared HTTP client, auth headers and status mapping.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};

use crate::error::PipeError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// Headers for a Bearer-token API (OpenRouter).
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = json_headers();
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Headers for fal.ai (`Authorization: Key <key>`).
pub fn key_headers(api_key: &str) -> HeaderMap {
    let mut headers = json_headers();
    if let Ok(val) = HeaderValue::from_str(&format!("Key {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

pub fn trim_trailing_slash(url: &str) -> &str {
    url.trim_end_matches('/')
}

/// Join a base URL and a backend path with exactly one slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", trim_trailing_slash(base), path.trim_start_matches('/'))
}

/// Map a non-success HTTP response to an error.
pub fn status_to_error(status: u16, retry_after: Option<&HeaderValue>, body: &str) -> PipeError {
    match status {
        401 | 403 => PipeError::Authentication(error_message(body)),
        429 => PipeError::RateLimited {
            retry_after_ms: retry_after
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(|secs| secs * 1000),
        },
        _ => PipeError::api(status, error_message(body)),
    }
}

/// Convenience wrapper reading the `Retry-After` header from `response`.
pub async fn error_from_response(response: reqwest::Response) -> PipeError {
    let status = response.status().as_u16();
    let retry_after = response.headers().get(RETRY_AFTER).cloned();
    let body = response.text().await.unwrap_or_default();
    status_to_error(status, retry_after.as_ref(), &body)
}

/// Human-readable message from a JSON error body (`detail` or `error.message`),
/// falling back to the raw body.
fn error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let message = parsed.as_ref().and_then(|v| {
        v.get("detail")
            .and_then(|d| d.as_str())
            .or_else(|| v.pointer("/error/message").and_then(|m| m.as_str()))
            .map(str::to_string)
    });
    message.unwrap_or_else(|| body.to_string())
}
