//! The generation client.

use crate::config::{ApiKey, Config};
use crate::error::Result;
use crate::service::{GeminiService, GenerationService};
use crate::video::{Sleeper, TokioSleeper};
use std::sync::Arc;

/// Builder for a [`GenerationClient`] backed by [`GeminiService`].
#[derive(Clone, Default)]
pub struct GenerationClientBuilder {
    config: Option<Config>,
    api_key: Option<ApiKey>,
    http: Option<reqwest::Client>,
    sleeper: Option<Arc<dyn Sleeper>>,
}

impl GenerationClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the given configuration instead of the defaults.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets a confirmed API key, overriding any key in the configuration.
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Uses an existing HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Replaces the sleeper used between status checks.
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Builds the client.
    ///
    /// A missing API key is not an error here; each operation checks for it
    /// before doing any work.
    pub fn build(self) -> GenerationClient<GeminiService> {
        let mut config = self.config.unwrap_or_default();
        if let Some(key) = self.api_key {
            config = config.with_api_key(key);
        }
        let service = match self.http {
            Some(client) => GeminiService::with_client(client, config.base_url()),
            None => GeminiService::from_config(&config),
        };

        let mut client = GenerationClient::with_service(service, config);
        if let Some(sleeper) = self.sleeper {
            client.sleeper = sleeper;
        }
        client
    }
}

/// Edits images and generates videos through a [`GenerationService`].
///
/// Each call is independent; the client holds no per-call state and can be
/// shared across tasks.
pub struct GenerationClient<S = GeminiService> {
    pub(crate) service: S,
    pub(crate) config: Config,
    pub(crate) sleeper: Arc<dyn Sleeper>,
}

impl GenerationClient<GeminiService> {
    /// Creates a new `GenerationClientBuilder`.
    pub fn builder() -> GenerationClientBuilder {
        GenerationClientBuilder::new()
    }

    /// Builds a client from [`Config::from_env`].
    pub fn from_env() -> Self {
        Self::builder().config(Config::from_env()).build()
    }
}

impl<S: GenerationService> GenerationClient<S> {
    /// Wraps an arbitrary service implementation.
    pub fn with_service(service: S, config: Config) -> Self {
        Self {
            service,
            config,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replaces the sleeper used between status checks.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Returns the underlying service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The credential gate run before any file is read or request sent.
    pub(crate) fn credential(&self) -> Result<&ApiKey> {
        self.config.require_api_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FramecraftError;

    #[test]
    fn test_builder_without_key_builds() {
        let client = GenerationClient::builder().build();
        assert!(matches!(client.credential(), Err(FramecraftError::Auth(_))));
    }

    #[test]
    fn test_builder_key_overrides_config() {
        let config = Config::new().with_api_key(ApiKey::new("from-config").unwrap());
        let client = GenerationClient::builder()
            .config(config)
            .api_key(ApiKey::new("explicit").unwrap())
            .build();
        assert_eq!(client.credential().unwrap().expose(), "explicit");
    }

    #[test]
    fn test_builder_uses_config_base_url() {
        let config = Config::new().with_base_url("http://127.0.0.1:9/v1beta");
        let client = GenerationClient::builder().config(config).build();
        assert_eq!(client.service().base_url(), "http://127.0.0.1:9/v1beta");
    }
}
