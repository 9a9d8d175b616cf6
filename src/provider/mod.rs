//! Backend traits and their HTTP implementations.

pub mod http;

#[cfg(feature = "fal")]
pub mod fal;
#[cfg(feature = "openrouter")]
pub mod openrouter;

use async_trait::async_trait;

use crate::error::PipeError;
use crate::types::{ChatMessage, GenerationOutput};

/// Argument object sent to the image backend.
pub type Arguments = serde_json::Map<String, serde_json::Value>;

/// Tag list returned when no suggestion backend is usable.
pub const FALLBACK_TAGS: &str = r#"{"tags": ["Image Generation", "Art"]}"#;

/// Image generation service.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Provider name (e.g. "fal").
    fn provider_name(&self) -> &str;

    /// Run the model at `path` with `arguments` and return its images.
    async fn generate(&self, path: &str, arguments: &Arguments)
        -> Result<GenerationOutput, PipeError>;
}

/// Produces chat tags for a conversation on behalf of the host.
///
/// Implementations never fail; they degrade to [`FALLBACK_TAGS`].
#[async_trait]
pub trait TagSuggester: Send + Sync {
    async fn suggest_tags(&self, messages: &[ChatMessage]) -> String;
}

/// Suggester that always answers with [`FALLBACK_TAGS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticTagSuggester;

#[async_trait]
impl TagSuggester for StaticTagSuggester {
    async fn suggest_tags(&self, _messages: &[ChatMessage]) -> String {
        FALLBACK_TAGS.to_string()
    }
}
