#![cfg(feature = "openrouter")]

use std::time::Duration;

use fal_pipe::provider::openrouter::OpenRouterTagSuggester;
use fal_pipe::provider::{TagSuggester, FALLBACK_TAGS};
use fal_pipe::types::ChatMessage;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TAG_MODEL: &str = "qwen/qwen-3-vl-32b-instruct";

fn conversation() -> Vec<ChatMessage> {
    vec![
        ChatMessage::user("a lighthouse at dusk --ar 16:9"),
        ChatMessage::assistant("![Generated Image](https://cdn.test/a.png)"),
        ChatMessage::user("### Task:\nGenerate 1-3 broad tags categorizing the main themes"),
    ]
}

fn suggester(server: &MockServer) -> OpenRouterTagSuggester {
    OpenRouterTagSuggester::new_with_base_url("or-key".to_string(), TAG_MODEL, server.uri())
}

#[tokio::test]
async fn returns_first_choice_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer or-key"))
        .and(header("http-referer", "https://openwebui.com"))
        .and(header("x-title", "OpenWebUI Tag Generation"))
        .and(body_partial_json(json!({
            "model": TAG_MODEL,
            "temperature": 0.3,
            "max_tokens": 200,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"tags\": [\"Architecture\"]}"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tags = suggester(&server).suggest_tags(&conversation()).await;
    assert_eq!(tags, r#"{"tags": ["Architecture"]}"#);
}

#[tokio::test]
async fn forwards_the_whole_conversation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "user", "content": "a lighthouse at dusk --ar 16:9"},
                {"role": "assistant", "content": "![Generated Image](https://cdn.test/a.png)"},
                {"role": "user", "content": "### Task:\nGenerate 1-3 broad tags categorizing the main themes"},
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "ok"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(suggester(&server).suggest_tags(&conversation()).await, "ok");
}

#[tokio::test]
async fn empty_choices_fall_back() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    assert_eq!(
        suggester(&server).suggest_tags(&conversation()).await,
        FALLBACK_TAGS
    );
}

#[tokio::test]
async fn http_error_falls_back() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(
        suggester(&server).suggest_tags(&conversation()).await,
        FALLBACK_TAGS
    );
}

#[tokio::test]
async fn timeout_falls_back() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": [{"message": {"content": "late"}}]}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let tags = suggester(&server)
        .with_timeout(Duration::from_millis(100))
        .suggest_tags(&conversation())
        .await;
    assert_eq!(tags, FALLBACK_TAGS);
}

#[tokio::test]
async fn missing_key_skips_the_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let suggester =
        OpenRouterTagSuggester::new_with_base_url(String::new(), TAG_MODEL, server.uri());
    assert_eq!(suggester.suggest_tags(&conversation()).await, FALLBACK_TAGS);
}
