//! Configuration system (layered: defaults < config file < env).
//!
//! These are the pipe's "valves": credentials, base image dimensions and
//! request defaults that prompt tags may override per request.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use bon::Builder;
use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::PipeError;
use crate::models::{ModelCapability, ModelRegistry};
use crate::types::BaseDimensions;
use crate::util::retry::RetryPolicy;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 1422;
pub const DEFAULT_ASPECT_RATIO: &str = "9:16";
pub const DEFAULT_TAG_MODEL: &str = "qwen/qwen-3-vl-32b-instruct";
pub const DEFAULT_FAL_BASE_URL: &str = "https://fal.run";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Pipe configuration.
#[derive(Clone, Builder, Deserialize)]
#[serde(default)]
pub struct PipeConfig {
    /// fal.ai API key (required for generation).
    #[builder(default, into)]
    pub fal_key: String,
    /// Base width for models addressed in pixels.
    #[builder(default = DEFAULT_WIDTH)]
    pub width: u32,
    /// Base height for models addressed in pixels.
    #[builder(default = DEFAULT_HEIGHT)]
    pub height: u32,
    /// Aspect ratio for models addressed by ratio (Imagen 4, NanoBanana).
    #[builder(default = DEFAULT_ASPECT_RATIO.to_string(), into)]
    pub aspect_ratio: String,
    #[builder(default)]
    pub enable_safety_checker: bool,
    /// OpenRouter key for tag suggestions.
    #[builder(default, into)]
    pub openrouter_api_key: String,
    #[builder(default = DEFAULT_TAG_MODEL.to_string(), into)]
    pub tag_model: String,
    #[builder(default = DEFAULT_FAL_BASE_URL.to_string(), into)]
    pub fal_base_url: String,
    #[builder(default = DEFAULT_OPENROUTER_BASE_URL.to_string(), into)]
    pub openrouter_base_url: String,
    #[builder(default = DEFAULT_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,
    /// Attempts per generation call, including the first.
    #[builder(default = 1)]
    pub max_attempts: u32,
    /// Models added to (or replacing) the built-in table.
    #[builder(default)]
    pub models: Vec<ModelCapability>,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for PipeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &str| if key.is_empty() { "" } else { ".." };
        f.debug_struct("PipeConfig")
            .field("fal_key", &redact(&self.fal_key))
            .field("width", &self.width)
            .field("height", &self.height)
            .field("aspect_ratio", &self.aspect_ratio)
            .field("enable_safety_checker", &self.enable_safety_checker)
            .field("openrouter_api_key", &redact(&self.openrouter_api_key))
            .field("tag_model", &self.tag_model)
            .field("fal_base_url", &self.fal_base_url)
            .field("openrouter_base_url", &self.openrouter_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("models", &self.models.len())
            .finish()
    }
}

fn parse_env<T: FromStr>(key: &str, raw: &str) -> Result<T, PipeError> {
    raw.trim().parse::<T>().map_err(|_| {
        PipeError::Configuration(format!("Invalid value '{raw}' for {key}"))
    })
}

fn parse_env_bool(key: &str, raw: &str) -> Result<bool, PipeError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(PipeError::Configuration(format!(
            "Invalid value '{raw}' for {key}"
        ))),
    }
}

impl PipeConfig {
    /// Default config file location (`<config dir>/fal-pipe/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("ai", "fal", "fal-pipe").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Parse a TOML config document. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, PipeError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, PipeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Defaults overridden by environment variables (and `.env`).
    pub fn from_env() -> Result<Self, PipeError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Full layered load: defaults, then the config file, then the environment.
    ///
    /// An explicit `path` must exist; the default path is used only if present.
    pub fn load(path: Option<&Path>) -> Result<Self, PipeError> {
        let _ = dotenvy::dotenv();
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        let config = base.with_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, PipeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("FAL_KEY") {
            self.fal_key = v;
        }
        if let Some(v) = lookup("FAL_PIPE_WIDTH") {
            self.width = parse_env("FAL_PIPE_WIDTH", &v)?;
        }
        if let Some(v) = lookup("FAL_PIPE_HEIGHT") {
            self.height = parse_env("FAL_PIPE_HEIGHT", &v)?;
        }
        if let Some(v) = lookup("FAL_PIPE_ASPECT_RATIO") {
            self.aspect_ratio = v;
        }
        if let Some(v) = lookup("FAL_PIPE_ENABLE_SAFETY_CHECKER") {
            self.enable_safety_checker = parse_env_bool("FAL_PIPE_ENABLE_SAFETY_CHECKER", &v)?;
        }
        if let Some(v) = lookup("OPENROUTER_API_KEY") {
            self.openrouter_api_key = v;
        }
        if let Some(v) = lookup("FAL_PIPE_TAG_MODEL") {
            self.tag_model = v;
        }
        if let Some(v) = lookup("FAL_BASE_URL") {
            self.fal_base_url = v;
        }
        if let Some(v) = lookup("OPENROUTER_BASE_URL") {
            self.openrouter_base_url = v;
        }
        if let Some(v) = lookup("FAL_PIPE_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_env("FAL_PIPE_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("FAL_PIPE_MAX_ATTEMPTS") {
            self.max_attempts = parse_env("FAL_PIPE_MAX_ATTEMPTS", &v)?;
        }
        Ok(self)
    }

    /// Reject values the pipe cannot work with.
    pub fn validate(&self) -> Result<(), PipeError> {
        if self.width == 0 || self.height == 0 {
            return Err(PipeError::Configuration(format!(
                "Width and height must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_attempts == 0 {
            return Err(PipeError::Configuration(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(PipeError::Configuration(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Base dimensions for aspect-ratio tags.
    pub fn base_dimensions(&self) -> Result<BaseDimensions, PipeError> {
        BaseDimensions::new(self.width, self.height)
            .map_err(|e| PipeError::Configuration(e.to_string()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            ..RetryPolicy::default()
        }
    }

    /// Built-in models plus the ones declared in this config.
    pub fn registry(&self) -> Result<ModelRegistry, PipeError> {
        ModelRegistry::builtin().extended(self.models.clone())
    }

    pub fn has_fal_key(&self) -> bool {
        !self.fal_key.trim().is_empty()
    }
}
