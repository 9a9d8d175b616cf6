//! Diagnostics for tags that were stripped but could not be applied.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Why a tag produced no override. `Display` gives the user-facing text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagWarning {
    #[error("Unknown tag --{tag} ignored")]
    UnknownTag { tag: String },

    #[error("Tag --{tag} requires a value, skipping")]
    MissingValue { tag: String },

    #[error("Invalid boolean value '{value}' for --{tag}, skipping")]
    InvalidBoolean { tag: String, value: String },

    #[error("Invalid integer value '{value}' for --{tag}, skipping")]
    InvalidInteger { tag: String, value: String },

    #[error("Invalid float value '{value}' for --{tag}, skipping")]
    InvalidFloat { tag: String, value: String },

    #[error("Invalid aspect ratio '{value}' for --{tag}, expected format like '16:9', skipping")]
    MalformedRatio { tag: String, value: String },

    #[error("Invalid aspect ratio '{value}' for --{tag}, skipping")]
    DegenerateRatio { tag: String, value: String },

    #[error("Aspect ratio '{value}' for --{tag} is too large, skipping")]
    OversizedRatio { tag: String, value: String },
}

impl TagWarning {
    /// Name of the tag that caused the warning.
    pub fn tag(&self) -> &str {
        match self {
            Self::UnknownTag { tag }
            | Self::MissingValue { tag }
            | Self::InvalidBoolean { tag, .. }
            | Self::InvalidInteger { tag, .. }
            | Self::InvalidFloat { tag, .. }
            | Self::MalformedRatio { tag, .. }
            | Self::DegenerateRatio { tag, .. }
            | Self::OversizedRatio { tag, .. } => tag,
        }
    }

    /// The offending value, if the tag carried one.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::UnknownTag { .. } | Self::MissingValue { .. } => None,
            Self::InvalidBoolean { value, .. }
            | Self::InvalidInteger { value, .. }
            | Self::InvalidFloat { value, .. }
            | Self::MalformedRatio { value, .. }
            | Self::DegenerateRatio { value, .. }
            | Self::OversizedRatio { value, .. } => Some(value),
        }
    }
}

impl Serialize for TagWarning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
