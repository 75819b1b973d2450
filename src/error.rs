//! Error types for Learnify
//!
//! This module defines all error types used throughout the service,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Learnify operations
///
/// Only configuration, validation, and primary provider failures are
/// surfaced to HTTP callers as failed responses. Speech and fetch errors
/// are recorded as degraded stage outcomes by the audio pipeline.
#[derive(Error, Debug)]
pub enum LearnifyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing credentials for a provider
    #[error("{0} not configured")]
    MissingCredentials(String),

    /// Invalid request input (missing or blank question, malformed body)
    #[error("{0}")]
    Validation(String),

    /// Provider-related errors (API calls, unexpected responses, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Authentication errors (e.g., 401 Unauthorized)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Speech URL resolution errors
    #[error("Speech synthesis error: {0}")]
    Speech(String),

    /// Audio chunk fetch errors (status, timeout, redirects)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Upstream audio host is not on the allowlist
    #[error("Upstream host not allowed: {0}")]
    HostNotAllowed(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl LearnifyError {
    /// Whether this error means the service is missing required configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::MissingCredentials(_))
    }
}

/// Result type alias for Learnify operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = LearnifyError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_missing_credentials_display() {
        let error = LearnifyError::MissingCredentials("OPENROUTER_API_KEY".to_string());
        assert_eq!(error.to_string(), "OPENROUTER_API_KEY not configured");
    }

    #[test]
    fn test_validation_error_display() {
        let error = LearnifyError::Validation("question is required".to_string());
        assert_eq!(error.to_string(), "question is required");
    }

    #[test]
    fn test_provider_error_display() {
        let error = LearnifyError::Provider("API timeout".to_string());
        assert_eq!(error.to_string(), "Provider error: API timeout");
    }

    #[test]
    fn test_host_not_allowed_display() {
        let error = LearnifyError::HostNotAllowed("evil.example".to_string());
        assert_eq!(error.to_string(), "Upstream host not allowed: evil.example");
    }

    #[test]
    fn test_is_configuration() {
        assert!(LearnifyError::Config("x".to_string()).is_configuration());
        assert!(LearnifyError::MissingCredentials("x".to_string()).is_configuration());
        assert!(!LearnifyError::Validation("x".to_string()).is_configuration());
        assert!(!LearnifyError::Provider("x".to_string()).is_configuration());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: LearnifyError = io_error.into();
        assert!(matches!(error, LearnifyError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: LearnifyError = json_error.into();
        assert!(matches!(error, LearnifyError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: LearnifyError = yaml_error.into();
        assert!(matches!(error, LearnifyError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LearnifyError>();
    }
}
