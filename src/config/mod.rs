//! Backend credentials and endpoints.
//!
//! Everything that identifies *who* we talk to (API keys, endpoints, target
//! language) comes from the environment via [`Config::from_env`]. Per-run
//! knobs such as paths and sleep intervals are CLI options instead, see
//! [`crate::pipeline::PipelineOptions`].

use std::env;
use thiserror::Error;
use url::Url;

/// Environment variable names.
pub const ENV_VISION_API_KEY: &str = "GOOGLE_VISION_API_KEY";
pub const ENV_TRANSLATE_API_KEY: &str = "GOOGLE_TRANSLATE_API_KEY";
pub const ENV_VISION_ENDPOINT: &str = "VISION_ENDPOINT";
pub const ENV_TRANSLATE_ENDPOINT: &str = "TRANSLATE_ENDPOINT";
pub const ENV_TARGET_LANGUAGE: &str = "TARGET_LANGUAGE";

const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";
const DEFAULT_TRANSLATE_ENDPOINT: &str =
    "https://translation.googleapis.com/language/translate/v2";
const DEFAULT_TARGET_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    vision_api_key: Option<String>,
    translate_api_key: Option<String>,
    vision_endpoint: Url,
    translate_endpoint: Url,
    target_language: String,
}

impl Config {
    pub fn new(
        vision_api_key: Option<String>,
        translate_api_key: Option<String>,
        vision_endpoint: &str,
        translate_endpoint: &str,
        target_language: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let target_language = target_language.into().trim().to_lowercase();
        if target_language.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: ENV_TARGET_LANGUAGE,
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            vision_api_key: vision_api_key.filter(|k| !k.trim().is_empty()),
            translate_api_key: translate_api_key.filter(|k| !k.trim().is_empty()),
            vision_endpoint: parse_endpoint(ENV_VISION_ENDPOINT, vision_endpoint)?,
            translate_endpoint: parse_endpoint(ENV_TRANSLATE_ENDPOINT, translate_endpoint)?,
            target_language,
        })
    }

    /// Load from environment variables, falling back to the public Google endpoints.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vision_endpoint =
            env::var(ENV_VISION_ENDPOINT).unwrap_or_else(|_| DEFAULT_VISION_ENDPOINT.to_string());
        let translate_endpoint = env::var(ENV_TRANSLATE_ENDPOINT)
            .unwrap_or_else(|_| DEFAULT_TRANSLATE_ENDPOINT.to_string());
        let target_language =
            env::var(ENV_TARGET_LANGUAGE).unwrap_or_else(|_| DEFAULT_TARGET_LANGUAGE.to_string());

        Self::new(
            env::var(ENV_VISION_API_KEY).ok(),
            env::var(ENV_TRANSLATE_API_KEY).ok(),
            &vision_endpoint,
            &translate_endpoint,
            target_language,
        )
    }

    /// Vision API key; only needed when reverse image search runs.
    pub fn vision_api_key(&self) -> Result<&str, ConfigError> {
        self.vision_api_key
            .as_deref()
            .ok_or(ConfigError::Missing(ENV_VISION_API_KEY))
    }

    /// Translation API key; only needed when translation runs.
    pub fn translate_api_key(&self) -> Result<&str, ConfigError> {
        self.translate_api_key
            .as_deref()
            .ok_or(ConfigError::Missing(ENV_TRANSLATE_API_KEY))
    }

    pub fn vision_endpoint(&self) -> &Url {
        &self.vision_endpoint
    }

    pub fn translate_endpoint(&self) -> &Url {
        &self.translate_endpoint
    }

    /// ISO 639-1 code every scraped field is translated into.
    pub fn target_language(&self) -> &str {
        &self.target_language
    }
}

fn parse_endpoint(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
