//! Type-directed conversion of raw tag values.

use serde::Serialize;
use strum::{Display, EnumString};

use super::aspect::{AspectRatio, RatioError};
use super::warning::TagWarning;
use crate::types::{BaseDimensions, ImageSize};

/// Value kind of a backend parameter. Fixed per parameter name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ParameterKind {
    Flag,
    Integer,
    Float,
    AspectRatio,
    Text,
}

impl ParameterKind {
    pub fn of(parameter: &str) -> Self {
        match parameter {
            "enable_safety_checker" | "enhance_prompt" => Self::Flag,
            "num_inference_steps" | "num_images" | "seed" => Self::Integer,
            "guidance_scale" => Self::Float,
            "image_size" => Self::AspectRatio,
            _ => Self::Text,
        }
    }
}

/// A coerced override value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OverrideValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Size(ImageSize),
}

impl OverrideValue {
    /// JSON form for the backend argument map.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Value::from(*f),
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Size(size) => serde_json::json!({
                "width": size.width,
                "height": size.height,
            }),
        }
    }
}

fn parse_flag(tag: &str, raw: &str) -> Result<bool, TagWarning> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(TagWarning::InvalidBoolean {
            tag: tag.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Convert a tag's raw value into the kind its parameter expects.
///
/// Bare flags are `true`; every other kind needs a value.
pub fn coerce_value(
    tag: &str,
    raw: Option<&str>,
    parameter: &str,
    base: BaseDimensions,
) -> Result<OverrideValue, TagWarning> {
    let kind = ParameterKind::of(parameter);

    if kind == ParameterKind::Flag {
        return match raw {
            None => Ok(OverrideValue::Bool(true)),
            Some(raw) => parse_flag(tag, raw).map(OverrideValue::Bool),
        };
    }

    let value = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| TagWarning::MissingValue {
            tag: tag.to_string(),
        })?;

    match kind {
        ParameterKind::Integer => value
            .parse::<i64>()
            .map(OverrideValue::Integer)
            .map_err(|_| TagWarning::InvalidInteger {
                tag: tag.to_string(),
                value: value.to_string(),
            }),
        // JSON has no NaN or infinity.
        ParameterKind::Float => value
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(OverrideValue::Float)
            .ok_or_else(|| TagWarning::InvalidFloat {
                tag: tag.to_string(),
                value: value.to_string(),
            }),
        ParameterKind::AspectRatio => match AspectRatio::parse(value)
            .and_then(|ratio| ratio.dimensions_for(base))
        {
            Ok(size) => Ok(OverrideValue::Size(size)),
            Err(RatioError::Malformed) => Err(TagWarning::MalformedRatio {
                tag: tag.to_string(),
                value: value.to_string(),
            }),
            Err(RatioError::Degenerate) => Err(TagWarning::DegenerateRatio {
                tag: tag.to_string(),
                value: value.to_string(),
            }),
            Err(RatioError::Oversized) => Err(TagWarning::OversizedRatio {
                tag: tag.to_string(),
                value: value.to_string(),
            }),
        },
        ParameterKind::Text | ParameterKind::Flag => Ok(OverrideValue::Text(value.to_string())),
    }
}
