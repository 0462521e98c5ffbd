//! Connection settings for the completion endpoint.
//!
//! The credential is an explicit value handed to the client constructor
//! rather than something the client reads from the environment mid-call.

use crate::error::ConfigError;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "CEREBRAS_API_KEY";

/// Environment variable overriding the API base URL.
pub const API_BASE_ENV: &str = "HINDSIGHT_API_BASE";

/// Environment variable overriding the model identifier.
pub const MODEL_ENV: &str = "HINDSIGHT_MODEL";

/// Environment variable overriding the HTTP timeout in seconds.
pub const TIMEOUT_ENV: &str = "HINDSIGHT_REQUEST_TIMEOUT_SECS";

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.cerebras.ai/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "llama3.1-8b";

/// Default HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Configuration for [`super::ChatCompletionsClient`].
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the OpenAI-compatible API.
    pub api_base: String,
    /// Bearer token for the API.
    pub api_key: String,
    /// Model used for every request.
    pub model: String,
    /// HTTP timeout for a single request.
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &mask_key(&self.api_key))
            .field("model", &self.model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a configuration with the given key and default endpoint settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CEREBRAS_API_KEY`: API key (required)
    /// - `HINDSIGHT_API_BASE`: API base URL (default: https://api.cerebras.ai/v1)
    /// - `HINDSIGHT_MODEL`: Model identifier (default: llama3.1-8b)
    /// - `HINDSIGHT_REQUEST_TIMEOUT_SECS`: HTTP timeout (default: 120)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(API_KEY_ENV.to_string()))?;

        let mut config = Self::new(api_key);

        if let Some(val) = lookup(API_BASE_ENV) {
            config.api_base = val;
        }

        if let Some(val) = lookup(MODEL_ENV) {
            config.model = val;
        }

        if let Some(val) = lookup(TIMEOUT_ENV) {
            config.request_timeout_secs =
                val.trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::InvalidValue {
                        key: TIMEOUT_ENV.to_string(),
                        message: e.to_string(),
                    })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the HTTP timeout in seconds.
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey(API_KEY_ENV.to_string()));
        }

        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(ConfigError::ValidationFailed(format!(
                "api_base must be an http(s) URL, got '{}'",
                self.api_base
            )));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "model cannot be empty".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Mask all but the first and last four characters of a key.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}
