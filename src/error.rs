//! Error types for hindsight-forge operations.
//!
//! Defines error types for the major subsystems:
//! - LLM API interactions (transport and response parsing)
//! - Configuration and credential loading
//! - Dataset generation and JSONL persistence

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Missing API key: no credential configured for the completion endpoint")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({code}): {message}")]
    ApiError { code: u16, message: String },
}

impl LlmError {
    /// Returns true for failures of the remote call itself (network, auth, quota).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LlmError::RequestFailed(_) | LlmError::RateLimited(_) | LlmError::ApiError { .. }
        )
    }
}

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing API key: set {0} or pass --api-key")]
    MissingApiKey(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors that can occur while generating or persisting dialogue records.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Invalid roleplay in model response: {0}")]
    InvalidRoleplay(String),

    #[error("Store error at '{path}': {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(LlmError::RequestFailed("connection refused".to_string()).is_transport());
        assert!(LlmError::RateLimited("slow down".to_string()).is_transport());
        assert!(LlmError::ApiError {
            code: 401,
            message: "bad key".to_string()
        }
        .is_transport());
        assert!(!LlmError::ParseError("not json".to_string()).is_transport());
        assert!(!LlmError::MissingApiKey.is_transport());
    }

    #[test]
    fn test_generator_error_wraps_llm_error() {
        let err: GeneratorError = LlmError::ParseError("expected value".to_string()).into();
        assert!(err.to_string().contains("expected value"));
        assert!(matches!(err, GeneratorError::Llm(LlmError::ParseError(_))));
    }

    #[test]
    fn test_store_error_names_path() {
        let err = GeneratorError::Store {
            path: PathBuf::from("/tmp/out.jsonl"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = err.to_string();
        assert!(message.contains("/tmp/out.jsonl"));
        assert!(message.contains("denied"));
    }
}
