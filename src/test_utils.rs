//! Test utilities for Learnify
//!
//! Scripted language provider, temporary directories and assertion helpers
//! shared by unit tests.

use crate::config::Config;
use crate::error::{LearnifyError, Result};
use crate::providers::{CompletionResponse, Message, Provider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Examples
///
/// ```ignore
/// use learnify::test_utils::temp_dir;
///
/// let dir = temp_dir();
/// assert!(dir.path().exists());
/// ```
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Configuration writing audio into `dir`
pub fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.audio.output_dir = dir.path().join("audio");
    config
}

/// One call received by a `ScriptedProvider`
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
}

/// Provider that replays queued responses and records every call
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
    configured: bool,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            configured: true,
        }
    }

    /// A provider reporting missing credentials
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// Queue a successful completion
    pub fn respond(self, text: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queue a provider failure
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Err(message.into()));
        self
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        temperature: f32,
    ) -> Result<CompletionResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: model.to_string(),
            messages: messages.to_vec(),
            temperature,
        });

        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(CompletionResponse::new(Message::assistant(text))),
            Some(Err(message)) => Err(LearnifyError::Provider(message).into()),
            None => Err(LearnifyError::Provider("no scripted response left".to_string()).into()),
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn credential_name(&self) -> &str {
        "OPENROUTER_API_KEY"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_creation() {
        let dir = temp_dir();
        assert!(dir.path().exists());
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[test]
    fn test_test_config_is_valid() {
        let dir = temp_dir();
        let config = test_config(&dir);
        assert!(config.audio.output_dir.starts_with(dir.path()));
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_scripted_provider_replays_in_order() {
        let provider = ScriptedProvider::new().respond("first").fail("boom");

        let first = provider.complete("m", &[Message::user("q")], 0.5).await.unwrap();
        assert_eq!(first.text(), "first");
        assert_error_contains(provider.complete("m", &[], 0.2).await, "boom");
        assert_error_contains(provider.complete("m", &[], 0.2).await, "no scripted response");

        let calls = provider.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].messages, vec![Message::user("q")]);
        assert_eq!(calls[1].temperature, 0.2);
    }
}
