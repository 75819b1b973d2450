//! Provider module for Learnify
//!
//! This module contains the language-generation provider abstraction and
//! the OpenRouter implementation.

pub mod base;
pub mod openrouter;

pub use base::{CompletionResponse, Message, Provider, TokenUsage};
pub use openrouter::OpenRouterProvider;

use crate::config::ProviderConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create the configured language-generation provider
///
/// # Errors
///
/// Returns error if provider initialization fails
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn Provider>> {
    Ok(Arc::new(OpenRouterProvider::new(config.openrouter.clone())?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_without_key() {
        let provider = create_provider(&ProviderConfig::default()).unwrap();
        assert!(!provider.is_configured());
    }
}
