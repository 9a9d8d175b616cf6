//! Image dimensions and generated-image payloads.

use serde::{Deserialize, Serialize};

use crate::error::PipeError;

/// Pixel dimensions sent to the backend as `image_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Reference width/height used to anchor aspect-ratio tags.
///
/// Both sides are guaranteed non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaseDimensions {
    width: u32,
    height: u32,
}

impl BaseDimensions {
    /// Create base dimensions, rejecting a zero side.
    pub fn new(width: u32, height: u32) -> Result<Self, PipeError> {
        if width == 0 || height == 0 {
            return Err(PipeError::InvalidArgument(format!(
                "Base dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width divided by height.
    pub fn ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

impl From<BaseDimensions> for ImageSize {
    fn from(base: BaseDimensions) -> Self {
        ImageSize::new(base.width, base.height)
    }
}

/// One image returned by the generation backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl GeneratedImage {
    /// The image URL, if present and non-empty.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }
}

/// Result of a single backend generation call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOutput {
    pub images: Vec<GeneratedImage>,
    /// Raw response body, kept for diagnostics.
    pub raw: serde_json::Value,
}

impl GenerationOutput {
    /// Build an output from a backend JSON response (`{"images": [...]}`).
    pub fn from_response(raw: serde_json::Value) -> Result<Self, PipeError> {
        let images = match raw.get("images") {
            Some(value) if !value.is_null() => {
                serde_json::from_value::<Vec<GeneratedImage>>(value.clone())?
            }
            _ => Vec::new(),
        };
        Ok(Self { images, raw })
    }
}
