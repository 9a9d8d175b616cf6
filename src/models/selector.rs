//! Resolution of host model identifiers to registry entries.

use super::{ModelCapability, ModelRegistry};
use crate::error::PipeError;

/// Resolves the `model` field of a host request to a registry entry.
pub struct ModelSelector;

impl ModelSelector {
    /// Find the model whose id appears in `requested`.
    ///
    /// Hosts prefix pipe model ids (e.g. `fal_ai.falai-flux-2-pro`), so ids
    /// are matched as substrings. When several ids match, the longest wins:
    /// `falai-flux-2-pro` must not resolve to `falai-flux-2`.
    pub fn resolve<'r>(
        registry: &'r ModelRegistry,
        requested: &str,
    ) -> Result<&'r ModelCapability, PipeError> {
        registry
            .models()
            .iter()
            .filter(|m| !m.id.is_empty() && requested.contains(m.id.as_str()))
            .max_by_key(|m| m.id.len())
            .ok_or_else(|| PipeError::ModelNotFound(requested.to_string()))
    }
}
