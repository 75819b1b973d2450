//! Configuration management for Learnify
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{LearnifyError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Learnify
///
/// Holds the language provider settings, speech synthesis and audio storage
/// settings, session windowing, and the HTTP listener address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Language-generation provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Speech URL resolution and chunk fetch settings
    #[serde(default)]
    pub speech: SpeechConfig,
    /// Audio artifact storage settings
    #[serde(default)]
    pub audio: AudioConfig,
    /// Conversation history settings
    #[serde(default)]
    pub session: SessionConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OpenRouter chat-completions configuration
    #[serde(default)]
    pub openrouter: OpenRouterConfig,

    /// Temperature used for the summary/example follow-up call
    #[serde(default = "default_simplify_temperature")]
    pub simplify_temperature: f32,
}

fn default_simplify_temperature() -> f32 {
    0.2
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            openrouter: OpenRouterConfig::default(),
            simplify_temperature: default_simplify_temperature(),
        }
    }
}

/// OpenRouter provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    /// API key; usually supplied through `OPENROUTER_API_KEY`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Base URL for the chat-completions API (overridable for local mocks)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model used when a request does not name one
    #[serde(default = "default_model")]
    pub model: String,

    /// Temperature used when a request does not set one
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Timeout for each generation call (seconds)
    #[serde(default = "default_generation_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_base() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "meta-llama/llama-3.1-70b-instruct".to_string()
}

fn default_temperature() -> f32 {
    0.5
}

fn default_generation_timeout() -> u64 {
    60
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: default_api_base(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_seconds: default_generation_timeout(),
        }
    }
}

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Host used to build translate_tts URLs
    #[serde(default = "default_tts_host")]
    pub tts_host: String,

    /// Request the slow speaking rate
    #[serde(default)]
    pub slow: bool,

    /// Maximum characters per span for per-chunk fallback resolution
    #[serde(default = "default_chunk_chars")]
    pub chunk_chars: usize,

    /// Hosts that audio chunks may be fetched from
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,

    /// Timeout for each chunk fetch (seconds)
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,

    /// Maximum redirects followed per chunk fetch
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_tts_host() -> String {
    "https://translate.google.com".to_string()
}

fn default_chunk_chars() -> usize {
    crate::speech::segmenter::DEFAULT_MAX_CHUNK_CHARS
}

fn default_allowed_hosts() -> Vec<String> {
    vec![
        "translate.google.com".to_string(),
        "translate.googleapis.com".to_string(),
    ]
}

fn default_fetch_timeout() -> u64 {
    15
}

fn default_max_redirects() -> usize {
    5
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            tts_host: default_tts_host(),
            slow: false,
            chunk_chars: default_chunk_chars(),
            allowed_hosts: default_allowed_hosts(),
            fetch_timeout_seconds: default_fetch_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// Audio artifact storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Directory assembled audio files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Public path prefix the output directory is served under
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,

    /// Filename prefix for generated artifacts
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,

    /// Filename extension for generated artifacts
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public").join("audio")
}

fn default_public_prefix() -> String {
    "/audio".to_string()
}

fn default_filename_prefix() -> String {
    "learnify_audio".to_string()
}

fn default_extension() -> String {
    "mp3".to_string()
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            public_prefix: default_public_prefix(),
            filename_prefix: default_filename_prefix(),
            extension: default_extension(),
        }
    }
}

/// Conversation history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of most recent turns sent to the model as context
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

fn default_window_size() -> usize {
    6
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LearnifyError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| LearnifyError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_key) = std::env::var("OPENROUTER_API_KEY") {
            if !api_key.trim().is_empty() {
                self.provider.openrouter.api_key = Some(api_key);
            }
        }

        if let Ok(api_base) = std::env::var("LEARNIFY_API_BASE") {
            self.provider.openrouter.api_base = api_base;
        }

        if let Ok(model) = std::env::var("LEARNIFY_MODEL") {
            self.provider.openrouter.model = model;
        }

        if let Ok(temperature) = std::env::var("LEARNIFY_TEMPERATURE") {
            if let Ok(value) = temperature.parse() {
                self.provider.openrouter.temperature = value;
            } else {
                tracing::warn!("Invalid LEARNIFY_TEMPERATURE: {}", temperature);
            }
        }

        if let Ok(host) = std::env::var("LEARNIFY_HOST") {
            self.server.host = host;
        }

        // PORT is honored for parity with common hosting platforms; LEARNIFY_PORT wins
        for var in ["PORT", "LEARNIFY_PORT"] {
            if let Ok(port) = std::env::var(var) {
                if let Ok(value) = port.parse() {
                    self.server.port = value;
                } else {
                    tracing::warn!("Invalid {}: {}", var, port);
                }
            }
        }

        if let Ok(dir) = std::env::var("LEARNIFY_AUDIO_DIR") {
            self.audio.output_dir = PathBuf::from(dir);
        }

        if let Ok(tts_host) = std::env::var("LEARNIFY_TTS_HOST") {
            self.speech.tts_host = tts_host;
        }

        if let Ok(window) = std::env::var("LEARNIFY_HISTORY_WINDOW") {
            if let Ok(value) = window.parse() {
                self.session.window_size = value;
            } else {
                tracing::warn!("Invalid LEARNIFY_HISTORY_WINDOW: {}", window);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let crate::cli::Commands::Serve { host, port } = &cli.command {
            if let Some(host) = host {
                self.server.host = host.clone();
            }
            if let Some(port) = port {
                self.server.port = *port;
            }
        }
    }

    /// Whether a credential for the language provider is present
    pub fn has_provider_credentials(&self) -> bool {
        self.provider
            .openrouter
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Validate the configuration
    ///
    /// A missing API key is not a validation failure; requests report it
    /// individually so the server can still start and serve history.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let openrouter = &self.provider.openrouter;

        if openrouter.api_base.trim().is_empty() {
            return Err(
                LearnifyError::Config("provider.openrouter.api_base cannot be empty".to_string())
                    .into(),
            );
        }

        if openrouter.model.trim().is_empty() {
            return Err(
                LearnifyError::Config("provider.openrouter.model cannot be empty".to_string())
                    .into(),
            );
        }

        for (name, value) in [
            ("provider.openrouter.temperature", openrouter.temperature),
            ("provider.simplify_temperature", self.provider.simplify_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(LearnifyError::Config(format!(
                    "{} must be between 0.0 and 2.0",
                    name
                ))
                .into());
            }
        }

        if openrouter.timeout_seconds == 0 {
            return Err(LearnifyError::Config(
                "provider.openrouter.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.speech.chunk_chars == 0
            || self.speech.chunk_chars > crate::speech::google::MAX_SPAN_CHARS
        {
            return Err(LearnifyError::Config(format!(
                "speech.chunk_chars must be between 1 and {}",
                crate::speech::google::MAX_SPAN_CHARS
            ))
            .into());
        }

        if self.speech.allowed_hosts.is_empty() {
            return Err(
                LearnifyError::Config("speech.allowed_hosts cannot be empty".to_string()).into(),
            );
        }

        if self.speech.fetch_timeout_seconds == 0 {
            return Err(LearnifyError::Config(
                "speech.fetch_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if !self.audio.public_prefix.starts_with('/') || self.audio.public_prefix.len() < 2 {
            return Err(LearnifyError::Config(
                "audio.public_prefix must start with '/' and name a path".to_string(),
            )
            .into());
        }

        if self.audio.filename_prefix.is_empty() || self.audio.extension.is_empty() {
            return Err(LearnifyError::Config(
                "audio.filename_prefix and audio.extension cannot be empty".to_string(),
            )
            .into());
        }

        if self.session.window_size == 0 {
            return Err(LearnifyError::Config(
                "session.window_size must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
