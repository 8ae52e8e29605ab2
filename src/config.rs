//! Credential and endpoint configuration.

use crate::error::{FramecraftError, Result};
use std::fmt;

/// Default REST base for the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for image edits.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Default model for first/last-frame video generation.
pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// A confirmed API key.
///
/// Constructing one is the explicit signal that a credential was selected;
/// empty or blank keys are rejected.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Validates and wraps a key.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(FramecraftError::Auth("API key is empty".into()));
        }
        Ok(Self(key))
    }

    /// Returns the raw key.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Configuration for a [`GenerationClient`](crate::GenerationClient).
///
/// Nothing here is read from the environment implicitly; use
/// [`Config::from_env`] to opt in.
#[derive(Debug, Clone)]
pub struct Config {
    api_key: Option<ApiKey>,
    base_url: String,
    image_model: String,
    video_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
        }
    }
}

impl Config {
    /// Creates a configuration with defaults and no API key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from process environment variables.
    ///
    /// The key comes from `GEMINI_API_KEY` or `GOOGLE_API_KEY`. Endpoint and
    /// models can be overridden with `FRAMECRAFT_BASE_URL`,
    /// `FRAMECRAFT_IMAGE_MODEL` and `FRAMECRAFT_VIDEO_MODEL`. A missing key is
    /// not an error here; operations fail with [`FramecraftError::Auth`].
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut config = Self {
            api_key: API_KEY_ENV_VARS
                .iter()
                .find_map(|name| non_empty(*name))
                .and_then(|key| ApiKey::new(key).ok()),
            ..Self::default()
        };
        if let Some(url) = non_empty("FRAMECRAFT_BASE_URL") {
            config = config.with_base_url(url);
        }
        if let Some(model) = non_empty("FRAMECRAFT_IMAGE_MODEL") {
            config.image_model = model;
        }
        if let Some(model) = non_empty("FRAMECRAFT_VIDEO_MODEL") {
            config.video_model = model;
        }
        config
    }

    /// Sets a confirmed API key.
    pub fn with_api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the REST base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the model used for image edits.
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    /// Sets the model used for video generation.
    pub fn with_video_model(mut self, model: impl Into<String>) -> Self {
        self.video_model = model.into();
        self
    }

    /// Returns the configured key, if any.
    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    /// Returns the key or fails with [`FramecraftError::Auth`].
    pub fn require_api_key(&self) -> Result<&ApiKey> {
        self.api_key.as_ref().ok_or_else(|| {
            FramecraftError::Auth(format!(
                "no API key configured; set {} or provide one explicitly",
                API_KEY_ENV_VARS.join(" or ")
            ))
        })
    }

    /// Returns the REST base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the image edit model.
    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    /// Returns the video model.
    pub fn video_model(&self) -> &str {
        &self.video_model
    }
}
