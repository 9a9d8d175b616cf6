//! Error classification.

use fal_pipe::error::{ErrorCategory, PipeError, RecoverySuggestion};

#[test]
fn status_codes_map_to_categories() {
    assert_eq!(PipeError::api(401, "x").category(), ErrorCategory::Authentication);
    assert_eq!(PipeError::api(429, "x").category(), ErrorCategory::RateLimit);
    assert_eq!(PipeError::api(502, "x").category(), ErrorCategory::Server);
    assert_eq!(PipeError::api(422, "x").category(), ErrorCategory::Api);
}

#[test]
fn only_transient_errors_are_retryable() {
    assert!(PipeError::api(503, "busy").is_retryable());
    assert!(PipeError::RateLimited { retry_after_ms: Some(1000) }.is_retryable());
    assert!(PipeError::Timeout(120_000).is_retryable());
    assert!(!PipeError::api(400, "bad").is_retryable());
    assert!(!PipeError::Authentication("missing key".into()).is_retryable());
    assert!(!PipeError::ModelNotFound("gpt-4o".into()).is_retryable());
}

#[test]
fn recovery_suggestions() {
    assert_eq!(
        PipeError::Authentication("x".into()).recovery_suggestion(),
        RecoverySuggestion::CheckCredentials
    );
    assert_eq!(
        PipeError::Timeout(5).recovery_suggestion(),
        RecoverySuggestion::IncreaseTimeout
    );
    assert_eq!(
        PipeError::Configuration("x".into()).recovery_suggestion(),
        RecoverySuggestion::CheckConfiguration
    );
    assert_eq!(
        PipeError::api(500, "x").recovery_suggestion(),
        RecoverySuggestion::RetryWithBackoff
    );
}

#[test]
fn display_messages() {
    assert_eq!(
        PipeError::api(500, "boom").to_string(),
        "API error (status 500): boom"
    );
    assert_eq!(PipeError::Timeout(250).to_string(), "Timeout after 250ms");
    assert_eq!(
        PipeError::ModelNotFound("gpt-4o".into()).to_string(),
        "Model not found: gpt-4o"
    );
}

#[test]
fn serde_errors_convert() {
    let err: PipeError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
    assert_eq!(err.category(), ErrorCategory::Serialization);
}
