//! Built-in fal.ai model table.

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::capabilities::{ModelCapability, TagRule};
use crate::error::PipeError;

static BUILTIN: OnceLock<ModelRegistry> = OnceLock::new();

/// Tags accepted by every built-in model.
const STANDARD_TAGS: [(&str, &str); 8] = [
    ("ar", "image_size"),
    ("steps", "num_inference_steps"),
    ("seed", "seed"),
    ("guide", "guidance_scale"),
    ("repeat", "num_images"),
    ("safe", "enable_safety_checker"),
    ("format", "output_format"),
    ("speed", "acceleration"),
];

/// Immutable, ordered set of models the pipe can serve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRegistry {
    #[serde(default)]
    models: Vec<ModelCapability>,
}

fn standard_rules() -> Vec<TagRule> {
    STANDARD_TAGS
        .iter()
        .map(|(tag, parameter)| TagRule::new(*tag, *parameter))
        .collect()
}

fn builtin_model(id: &str, name: &str, path: &str) -> ModelCapability {
    ModelCapability::builder()
        .id(id)
        .name(name)
        .path(path)
        .tag_rules(standard_rules())
        .build()
}

impl ModelRegistry {
    /// Build a registry, rejecting duplicate model ids and duplicate tags.
    pub fn new(models: Vec<ModelCapability>) -> Result<Self, PipeError> {
        let mut ids = HashSet::new();
        for model in &models {
            if !ids.insert(model.id.as_str()) {
                return Err(PipeError::Configuration(format!(
                    "Duplicate model id '{}'",
                    model.id
                )));
            }
            let mut tags = HashSet::new();
            for rule in &model.tag_rules {
                if !tags.insert(rule.tag.as_str()) {
                    return Err(PipeError::Configuration(format!(
                        "Model '{}' declares tag '{}' more than once",
                        model.id, rule.tag
                    )));
                }
            }
        }
        Ok(Self { models })
    }

    /// The built-in fal.ai models (lazily initialized, shared).
    pub fn builtin() -> &'static ModelRegistry {
        BUILTIN.get_or_init(|| Self {
            models: Self::builtin_models(),
        })
    }

    fn builtin_models() -> Vec<ModelCapability> {
        let mut kontext_dev = builtin_model(
            "falai-flux-kontext-dev",
            "Flux.1 Kontext [dev]",
            "fal-ai/flux-kontext/dev",
        );
        kontext_dev
            .tag_rules
            .push(TagRule::new("enhance", "enhance_prompt"));

        vec![
            builtin_model("falai-flux-1-dev", "Flux.1 [dev]", "fal-ai/flux-1/dev"),
            kontext_dev,
            builtin_model("falai-flux-pro", "Flux.1 [pro]", "fal-ai/flux-pro/v1.1"),
            builtin_model(
                "falai-flux-pro-kontext",
                "Flux.1 Kontext [pro]",
                "fal-ai/flux-pro/kontext",
            ),
            builtin_model("falai-flux-2", "Flux.2 [dev]", "fal-ai/flux-2"),
            builtin_model("falai-flux-2-flex", "Flux.2 [flex]", "fal-ai/flux-2-flex"),
            builtin_model("falai-flux-2-pro", "Flux.2 [pro]", "fal-ai/flux-2-pro"),
            builtin_model(
                "falai-flux-2-klein-4b",
                "Flux.2 [klein] - 4b",
                "fal-ai/flux-2/klein/4b",
            ),
            builtin_model(
                "falai-nano-banana-pro",
                "NanoBanana [pro]",
                "fal-ai/nano-banana-pro",
            ),
            builtin_model(
                "falai-z-image-turbo",
                "Z-Image [turbo]",
                "fal-ai/z-image/turbo",
            ),
        ]
    }

    /// Parse a registry from TOML (`[[models]]` tables).
    pub fn from_toml_str(s: &str) -> Result<Self, PipeError> {
        let parsed: ModelRegistry = toml::from_str(s)?;
        Self::new(parsed.models)
    }

    /// Return a registry with `extra` appended; an extra model replaces a
    /// built-in one with the same id.
    pub fn extended(&self, extra: Vec<ModelCapability>) -> Result<Self, PipeError> {
        let mut models: Vec<ModelCapability> = self
            .models
            .iter()
            .filter(|m| !extra.iter().any(|e| e.id == m.id))
            .cloned()
            .collect();
        models.extend(extra);
        Self::new(models)
    }

    pub fn models(&self) -> &[ModelCapability] {
        &self.models
    }

    /// Look up a model by its exact id.
    pub fn get(&self, id: &str) -> Option<&ModelCapability> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Look up a model by its backend path.
    pub fn by_path(&self, path: &str) -> Option<&ModelCapability> {
        self.models.iter().find(|m| m.path == path)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
