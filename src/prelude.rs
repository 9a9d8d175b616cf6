//! Convenience re-exports for common use.

pub use crate::config::PipeConfig;
pub use crate::error::{PipeError, Result};
pub use crate::models::{ModelCapability, ModelRegistry, ModelSelector, TagRule};
pub use crate::pipe::Pipe;
pub use crate::provider::{ImageBackend, TagSuggester};
pub use crate::tags::{parse_prompt_tags, OverrideValue, ParseResult, TagWarning};
pub use crate::types::{
    BaseDimensions, ChatMessage, GeneratedImage, GenerationOutput, ImageSize, PipeRequest,
    StatusEvent, StatusSink,
};
