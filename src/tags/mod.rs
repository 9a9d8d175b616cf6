//! Inline prompt tags (`--steps 24 --ar 16:9`) and their resolution into
//! per-request parameter overrides.
//!
//! ```
//! use fal_pipe::models::ModelRegistry;
//! use fal_pipe::tags::{parse_prompt_tags, OverrideValue};
//! use fal_pipe::types::{BaseDimensions, ImageSize};
//!
//! let model = ModelRegistry::builtin().get("falai-flux-2").unwrap();
//! let base = BaseDimensions::new(800, 1422).unwrap();
//! let parsed = parse_prompt_tags("a dog in a park --steps 24 --ar 16:9", model, base);
//!
//! assert_eq!(parsed.cleaned_prompt, "a dog in a park");
//! assert_eq!(parsed.overrides["num_inference_steps"], OverrideValue::Integer(24));
//! assert_eq!(
//!     parsed.overrides["image_size"],
//!     OverrideValue::Size(ImageSize::new(2528, 1422))
//! );
//! assert!(parsed.warnings.is_empty());
//! ```

pub mod aspect;
pub mod coerce;
pub mod tokenizer;
pub mod warning;

pub use aspect::AspectRatio;
pub use coerce::{coerce_value, OverrideValue, ParameterKind};
pub use tokenizer::{tokenize, TagToken};
pub use warning::TagWarning;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::models::ModelCapability;
use crate::types::BaseDimensions;

/// Outcome of parsing one prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseResult {
    /// Prompt with every tag removed and whitespace normalized.
    pub cleaned_prompt: String,
    /// Parameter name to override value; later tags win.
    pub overrides: BTreeMap<String, OverrideValue>,
    /// One entry per tag that could not be applied, in prompt order.
    pub warnings: Vec<TagWarning>,
}

impl ParseResult {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// Overrides as a JSON object, ready to merge over request defaults.
    pub fn overrides_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.overrides
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }
}

/// Parse the tags in `prompt` against `model`'s tag rules.
///
/// Never fails: unknown tags and bad values become warnings. Every token is
/// stripped from the prompt whether or not it applied. A model without tag
/// rules gets the prompt back untouched.
pub fn parse_prompt_tags(
    prompt: &str,
    model: &ModelCapability,
    base: BaseDimensions,
) -> ParseResult {
    if !model.supports_tags() {
        return ParseResult {
            cleaned_prompt: prompt.to_string(),
            ..Default::default()
        };
    }

    let tokens = tokenize(prompt);
    let mut overrides = BTreeMap::new();
    let mut warnings = Vec::new();

    for token in &tokens {
        let Some(parameter) = model.parameter_for(token.name) else {
            warnings.push(TagWarning::UnknownTag {
                tag: token.name.to_string(),
            });
            continue;
        };

        match coerce_value(token.name, token.value, parameter, base) {
            Ok(value) => {
                overrides.insert(parameter.to_string(), value);
            }
            Err(warning) => warnings.push(warning),
        }
    }

    debug!(
        model = %model.id,
        tags = tokens.len(),
        overrides = overrides.len(),
        warnings = warnings.len(),
        "parsed prompt tags"
    );

    ParseResult {
        cleaned_prompt: tokenizer::strip_tokens(prompt, &tokens),
        overrides,
        warnings,
    }
}
