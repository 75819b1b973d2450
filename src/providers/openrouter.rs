//! OpenRouter provider implementation for Learnify
//!
//! This module implements the Provider trait against OpenRouter's
//! OpenAI-compatible `/chat/completions` endpoint.

use crate::config::OpenRouterConfig;
use crate::error::{LearnifyError, Result};
use crate::providers::{CompletionResponse, Message, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable the API key is read from
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// OpenRouter API provider
///
/// # Examples
///
/// ```no_run
/// use learnify::config::OpenRouterConfig;
/// use learnify::providers::{OpenRouterProvider, Provider, Message};
///
/// # async fn example() -> learnify::error::Result<()> {
/// let config = OpenRouterConfig {
///     api_key: Some("sk-or-...".to_string()),
///     ..Default::default()
/// };
/// let provider = OpenRouterProvider::new(config)?;
/// let messages = vec![Message::user("Explain gravity")];
/// let completion = provider
///     .complete("meta-llama/llama-3.1-70b-instruct", &messages, 0.5)
///     .await?;
/// println!("{}", completion.text());
/// # Ok(())
/// # }
/// ```
pub struct OpenRouterProvider {
    client: Client,
    config: OpenRouterConfig,
}

/// Request body for /chat/completions
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
}

/// Response body from /chat/completions
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}

impl OpenRouterProvider {
    /// Create a new OpenRouter provider instance
    ///
    /// A missing API key does not fail construction; calls fail with
    /// `LearnifyError::MissingCredentials` instead.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: OpenRouterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("learnify/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LearnifyError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized OpenRouter provider: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self { client, config })
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }

    fn convert_response(response: ChatCompletionResponse) -> CompletionResponse {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        let message = Message::assistant(content.trim());

        match response.usage {
            Some(usage) => CompletionResponse::with_usage(
                message,
                TokenUsage::new(usage.prompt_tokens, usage.completion_tokens),
            ),
            None => CompletionResponse::new(message),
        }
    }
}

#[async_trait]
impl Provider for OpenRouterProvider {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        temperature: f32,
    ) -> Result<CompletionResponse> {
        let api_key = self
            .api_key()
            .ok_or_else(|| LearnifyError::MissingCredentials(API_KEY_ENV.to_string()))?;

        let url = self.completions_url();
        tracing::debug!(
            "Sending {} messages to OpenRouter: model={}, temperature={}",
            messages.len(),
            model,
            temperature
        );

        let request = ChatCompletionRequest {
            model,
            messages,
            temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .header("X-Title", "Learnify")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Failed to reach OpenRouter: {}", e);
                LearnifyError::Provider(format!("Failed to reach OpenRouter: {}", e))
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LearnifyError::Authentication(format!(
                "OpenRouter rejected the API key: {}",
                error_text
            ))
            .into());
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("OpenRouter returned error {}: {}", status, error_text);
            return Err(LearnifyError::Provider(format!(
                "OpenRouter returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse OpenRouter response: {}", e);
            LearnifyError::Provider(format!("Failed to parse OpenRouter response: {}", e))
        })?;

        let completion = Self::convert_response(body);
        if let Some(usage) = &completion.usage {
            tracing::debug!(
                "OpenRouter usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        Ok(completion)
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    fn credential_name(&self) -> &str {
        API_KEY_ENV
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> OpenRouterConfig {
        OpenRouterConfig {
            api_key: key.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_openrouter_provider_creation() {
        let provider = OpenRouterProvider::new(config_with_key(Some("sk-test"))).unwrap();
        assert_eq!(provider.config.api_base, "https://openrouter.ai/api/v1");
        assert!(provider.is_configured());
        assert_eq!(provider.credential_name(), "OPENROUTER_API_KEY");
    }

    #[test]
    fn test_provider_without_key_is_not_configured() {
        assert!(!OpenRouterProvider::new(config_with_key(None))
            .unwrap()
            .is_configured());
        assert!(!OpenRouterProvider::new(config_with_key(Some("  ")))
            .unwrap()
            .is_configured());
    }

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        let config = OpenRouterConfig {
            api_base: "http://localhost:9999/api/v1/".to_string(),
            ..Default::default()
        };
        let provider = OpenRouterProvider::new(config).unwrap();
        assert_eq!(
            provider.completions_url(),
            "http://localhost:9999/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_convert_response_reads_first_choice() {
        let body: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "  Gravity pulls.  " } },
                { "message": { "role": "assistant", "content": "ignored" } }
            ],
            "usage": { "prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15 }
        }))
        .unwrap();

        let completion = OpenRouterProvider::convert_response(body);
        assert_eq!(completion.text(), "Gravity pulls.");
        assert_eq!(completion.usage, Some(TokenUsage::new(12, 3)));
    }

    #[test]
    fn test_convert_response_without_choices_is_empty() {
        let body: ChatCompletionResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        let completion = OpenRouterProvider::convert_response(body);
        assert_eq!(completion.text(), "");
        assert!(completion.usage.is_none());
    }

    #[tokio::test]
    async fn test_complete_without_key_fails_with_missing_credentials() {
        let provider = OpenRouterProvider::new(config_with_key(None)).unwrap();
        let err = provider
            .complete("model", &[Message::user("hi")], 0.5)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LearnifyError>(),
            Some(LearnifyError::MissingCredentials(_))
        ));
    }
}
