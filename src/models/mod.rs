//! Model capability registry and request-model resolution.

pub mod capabilities;
pub mod registry;
pub mod selector;

pub use capabilities::{ModelCapability, TagRule};
pub use registry::ModelRegistry;
pub use selector::ModelSelector;
