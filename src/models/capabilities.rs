//! Per-model tag capability descriptor.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Associates an inline prompt tag with the backend parameter it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagRule {
    pub tag: String,
    pub parameter: String,
}

impl TagRule {
    pub fn new(tag: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            parameter: parameter.into(),
        }
    }
}

/// Describes one image model: how it is addressed and which tags it accepts.
///
/// An empty `tag_rules` list disables tag parsing for the model.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct ModelCapability {
    #[builder(into)]
    pub id: String,
    #[builder(into)]
    pub name: String,
    /// Backend routing path, passed through verbatim.
    #[builder(into)]
    pub path: String,
    #[builder(default)]
    #[serde(default)]
    pub tag_rules: Vec<TagRule>,
}

impl ModelCapability {
    /// Parameter name for a tag, if the model accepts it.
    pub fn parameter_for(&self, tag: &str) -> Option<&str> {
        self.tag_rules
            .iter()
            .find(|rule| rule.tag == tag)
            .map(|rule| rule.parameter.as_str())
    }

    /// Whether any tag of this model maps to `parameter`.
    pub fn accepts_parameter(&self, parameter: &str) -> bool {
        self.tag_rules.iter().any(|rule| rule.parameter == parameter)
    }

    pub fn supports_tags(&self) -> bool {
        !self.tag_rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ModelCapability {
        ModelCapability::builder()
            .id("test-model")
            .name("Test")
            .path("fal-ai/test")
            .tag_rules(vec![
                TagRule::new("steps", "num_inference_steps"),
                TagRule::new("safe", "enable_safety_checker"),
            ])
            .build()
    }

    #[test]
    fn parameter_lookup() {
        let m = model();
        assert_eq!(m.parameter_for("steps"), Some("num_inference_steps"));
        assert_eq!(m.parameter_for("ar"), None);
        assert!(m.accepts_parameter("enable_safety_checker"));
        assert!(!m.accepts_parameter("image_size"));
    }

    #[test]
    fn builder_defaults_to_no_tags() {
        let m = ModelCapability::builder()
            .id("bare")
            .name("Bare")
            .path("fal-ai/bare")
            .build();
        assert!(!m.supports_tags());
    }
}
