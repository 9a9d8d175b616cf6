//! Request handling for the host: model resolution, tag parsing, argument
//! assembly and the streamed reply.

use std::sync::Arc;

use futures::stream::BoxStream;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::PipeConfig;
use crate::error::PipeError;
use crate::models::{ModelRegistry, ModelSelector};
use crate::provider::{Arguments, ImageBackend, TagSuggester};
use crate::tags::{parse_prompt_tags, ParseResult};
use crate::types::{BaseDimensions, GenerationOutput, PipeRequest, StatusEvent, StatusSink};

/// Path fragments of models addressed by `aspect_ratio` instead of `image_size`.
const RATIO_ADDRESSED: [&str; 2] = ["imagen4", "nano-banana"];

/// The image-generation pipe.
#[derive(Clone)]
pub struct Pipe {
    config: Arc<PipeConfig>,
    registry: Arc<ModelRegistry>,
    base: BaseDimensions,
    backend: Arc<dyn ImageBackend>,
    suggester: Arc<dyn TagSuggester>,
}

impl std::fmt::Debug for Pipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipe")
            .field("config", &self.config)
            .field("models", &self.registry.len())
            .field("backend", &self.backend.provider_name())
            .finish()
    }
}

impl Pipe {
    pub fn new(
        config: PipeConfig,
        registry: ModelRegistry,
        backend: Arc<dyn ImageBackend>,
        suggester: Arc<dyn TagSuggester>,
    ) -> Result<Self, PipeError> {
        config.validate()?;
        let base = config.base_dimensions()?;
        Ok(Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            base,
            backend,
            suggester,
        })
    }

    /// Pipe wired to fal.ai from `config`. Tag suggestions go to OpenRouter
    /// when that backend is compiled in.
    #[cfg(feature = "fal")]
    pub fn from_config(config: PipeConfig) -> Result<Self, PipeError> {
        use crate::provider::fal::FalBackend;

        #[cfg(feature = "openrouter")]
        let suggester: Arc<dyn TagSuggester> = Arc::new(
            crate::provider::openrouter::OpenRouterTagSuggester::from_config(&config),
        );
        #[cfg(not(feature = "openrouter"))]
        let suggester: Arc<dyn TagSuggester> = Arc::new(crate::provider::StaticTagSuggester);

        let registry = config.registry()?;
        let backend = Arc::new(FalBackend::from_config(&config));
        Self::new(config, registry, backend, suggester)
    }

    pub fn config(&self) -> &PipeConfig {
        &self.config
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// `(id, name)` of every model the host may offer.
    pub fn pipes(&self) -> Vec<(String, String)> {
        self.registry
            .models()
            .iter()
            .map(|m| (m.id.clone(), m.name.clone()))
            .collect()
    }

    /// Arguments for the backend: defaults from the config, then `parsed`
    /// overrides on top.
    pub fn build_arguments(&self, path: &str, parsed: &ParseResult) -> Arguments {
        let mut arguments = Arguments::new();
        arguments.insert(
            "prompt".to_string(),
            Value::String(parsed.cleaned_prompt.clone()),
        );
        arguments.insert(
            "enable_safety_checker".to_string(),
            Value::Bool(self.config.enable_safety_checker),
        );
        if RATIO_ADDRESSED.iter().any(|fragment| path.contains(fragment)) {
            arguments.insert(
                "aspect_ratio".to_string(),
                Value::String(self.config.aspect_ratio.clone()),
            );
        } else {
            arguments.insert(
                "image_size".to_string(),
                serde_json::json!({
                    "width": self.base.width(),
                    "height": self.base.height(),
                }),
            );
        }
        arguments.extend(parsed.overrides_json());
        arguments
    }

    /// Handle one host request, yielding reply chunks in order.
    ///
    /// Failures are reported in-band as reply text; the stream itself
    /// never errors.
    pub fn handle(
        &self,
        request: PipeRequest,
        sink: Option<StatusSink>,
    ) -> BoxStream<'static, String> {
        let pipe = self.clone();
        let stream = async_stream::stream! {
            let emit = |event: StatusEvent| {
                debug!(status = %event.description, done = event.done, "status");
                if let Some(sink) = &sink {
                    sink(event);
                }
            };

            let prompt = request.last_user_text();

            if !request.messages.is_empty() && is_tag_generation_request(&prompt) {
                info!("routing tag generation request");
                emit(StatusEvent::progress("Generating tags with OpenRouter..."));
                let tags = pipe.suggester.suggest_tags(&request.messages).await;
                emit(StatusEvent::finished("Tag generation complete"));
                yield tags;
                return;
            }

            let model = match ModelSelector::resolve(&pipe.registry, &request.model) {
                Ok(model) => model.clone(),
                Err(_) => {
                    yield unsupported_model_message(&request.model);
                    return;
                }
            };

            if request.messages.is_empty() {
                yield "Error: No messages found.".to_string();
                return;
            }
            if prompt.is_empty() {
                yield "Error: No prompt found.".to_string();
                return;
            }

            let parsed = parse_prompt_tags(&prompt, &model, pipe.base);
            for warning in &parsed.warnings {
                emit(StatusEvent::progress(format!("Warning: {warning}")));
            }

            if !pipe.config.has_fal_key() {
                yield "Error: FAL_KEY not set in valves.".to_string();
                return;
            }

            let arguments = pipe.build_arguments(&model.path, &parsed);
            emit(StatusEvent::progress(format!("Generating image with {}...", model.path)));

            match pipe.backend.generate(&model.path, &arguments).await {
                Ok(output) if !output.images.is_empty() => {
                    let count = output.images.len();
                    emit(StatusEvent::finished(format!(
                        "Generated {count} image{} successfully",
                        if count > 1 { "s" } else { "" }
                    )));
                    for chunk in image_chunks(&output) {
                        yield chunk;
                    }
                }
                Ok(output) => {
                    emit(StatusEvent::finished("Generation failed"));
                    yield format!("Error: Generation failed. Result: {}", output.raw);
                }
                Err(e) => {
                    emit(StatusEvent::finished(format!("Error: {e}")));
                    yield format!("Error: {e}");
                }
            }
        };
        Box::pin(stream)
    }
}

/// Whether `text` is the host asking for chat tags rather than an image.
pub fn is_tag_generation_request(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let lower = text.to_lowercase();
    (lower.contains("### task: generate") && lower.contains("tags"))
        || text.contains("\"tags\":")
        || lower.contains("categorizing the main themes")
}

fn unsupported_model_message(model: &str) -> String {
    format!(
        "**Error:** The selected model (`{model}`) is not supported by the Fal.ai Master Pipe.\n\n\
         Please select one of the **IMG:** models from the dropdown list."
    )
}

/// Markdown chunks for the generated images, one or two per image.
fn image_chunks(output: &GenerationOutput) -> Vec<String> {
    let count = output.images.len();
    let mut chunks = Vec::with_capacity(count * 2);
    for (index, image) in output.images.iter().enumerate() {
        let number = index + 1;
        match image.url() {
            Some(url) => {
                if count > 1 {
                    chunks.push(format!("**Image {number}/{count}**\n\n"));
                }
                chunks.push(format!("![Generated Image]({url})\n\n"));
            }
            None => chunks.push(format!("Warning: Image {number} URL missing\n\n")),
        }
    }
    chunks
}
