//! Two-tier resolution of text into upstream audio locations
//!
//! The bulk call lets the synthesizer segment the whole text itself. When
//! it fails or returns nothing, the text is segmented locally and each span
//! is resolved on its own; spans that fail are dropped, not retried.

use crate::error::Result;
use crate::speech::segmenter::{segment, DEFAULT_MAX_CHUNK_CHARS};
use async_trait::async_trait;
use std::sync::Arc;

/// Collaborator that turns text into fetchable audio locations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Resolve arbitrary-length text into ordered locations (bulk variant)
    async fn audio_urls(&self, text: &str, language_code: &str) -> Result<Vec<String>>;

    /// Resolve one short span into a single location
    async fn audio_url(&self, text: &str, language_code: &str) -> Result<String>;
}

/// Which tier produced the locations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionTier {
    /// The bulk multi-segment call succeeded
    Bulk,
    /// Locations came from per-span resolution
    PerChunk,
}

/// Ordered upstream locations for one text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Locations in presentation order
    pub locations: Vec<String>,
    /// Tier that produced them
    pub tier: ResolutionTier,
    /// Spans dropped because their resolution failed
    pub dropped_spans: usize,
}

impl Resolution {
    /// Whether no location could be resolved
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Resolves text into upstream audio locations
#[derive(Clone)]
pub struct SpeechUrlResolver {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    chunk_chars: usize,
}

impl SpeechUrlResolver {
    /// Create a resolver with the default 180 character fallback spans
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self::with_chunk_chars(synthesizer, DEFAULT_MAX_CHUNK_CHARS)
    }

    /// Create a resolver with a custom fallback span length
    pub fn with_chunk_chars(synthesizer: Arc<dyn SpeechSynthesizer>, chunk_chars: usize) -> Self {
        Self {
            synthesizer,
            chunk_chars,
        }
    }

    /// Resolve text into ordered locations
    ///
    /// An empty result means audio should be skipped for this text.
    pub async fn resolve(&self, text: &str, language_code: &str) -> Resolution {
        match self.synthesizer.audio_urls(text, language_code).await {
            Ok(locations) if !locations.is_empty() => {
                tracing::debug!("Bulk speech resolution returned {} locations", locations.len());
                return Resolution {
                    locations,
                    tier: ResolutionTier::Bulk,
                    dropped_spans: 0,
                };
            }
            Ok(_) => {
                tracing::warn!("Bulk speech resolution returned no locations, falling back to chunking");
            }
            Err(e) => {
                tracing::warn!(
                    "Bulk speech resolution failed, falling back to chunking: {}",
                    e
                );
            }
        }

        let spans = segment(text, self.chunk_chars);
        let mut locations = Vec::with_capacity(spans.len());
        let mut dropped_spans = 0;

        for span in &spans {
            match self.synthesizer.audio_url(span, language_code).await {
                Ok(location) => locations.push(location),
                Err(e) => {
                    dropped_spans += 1;
                    tracing::warn!(
                        "Chunk speech resolution failed for chunk length {}: {}",
                        span.chars().count(),
                        e
                    );
                }
            }
        }

        Resolution {
            locations,
            tier: ResolutionTier::PerChunk,
            dropped_spans,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LearnifyError;
    use mockall::predicate::eq;

    fn speech_error(message: &str) -> anyhow::Error {
        LearnifyError::Speech(message.to_string()).into()
    }

    #[tokio::test]
    async fn test_bulk_result_is_used_directly() {
        let mut synth = MockSpeechSynthesizer::new();
        synth
            .expect_audio_urls()
            .with(eq("Hello. World."), eq("en"))
            .times(1)
            .returning(|_, _| Ok(vec!["u1".to_string(), "u2".to_string()]));
        synth.expect_audio_url().never();

        let resolver = SpeechUrlResolver::new(Arc::new(synth));
        let resolution = resolver.resolve("Hello. World.", "en").await;

        assert_eq!(resolution.tier, ResolutionTier::Bulk);
        assert_eq!(resolution.locations, vec!["u1", "u2"]);
    }

    #[tokio::test]
    async fn test_bulk_failure_falls_back_to_per_chunk() {
        let mut synth = MockSpeechSynthesizer::new();
        synth
            .expect_audio_urls()
            .returning(|_, _| Err(speech_error("bulk unavailable")));
        synth
            .expect_audio_url()
            .times(2)
            .returning(|text, lang| Ok(format!("{}:{}", lang, text)));

        let resolver = SpeechUrlResolver::with_chunk_chars(Arc::new(synth), 12);
        let resolution = resolver.resolve("One two. Three four.", "fr").await;

        assert_eq!(resolution.tier, ResolutionTier::PerChunk);
        assert_eq!(resolution.locations, vec!["fr:One two.", "fr:Three four."]);
        assert_eq!(resolution.dropped_spans, 0);
    }

    #[tokio::test]
    async fn test_empty_bulk_result_falls_back() {
        let mut synth = MockSpeechSynthesizer::new();
        synth.expect_audio_urls().returning(|_, _| Ok(Vec::new()));
        synth
            .expect_audio_url()
            .times(1)
            .returning(|text, _| Ok(text.to_string()));

        let resolver = SpeechUrlResolver::new(Arc::new(synth));
        let resolution = resolver.resolve("Short answer.", "en").await;

        assert_eq!(resolution.tier, ResolutionTier::PerChunk);
        assert_eq!(resolution.locations, vec!["Short answer."]);
    }

    #[tokio::test]
    async fn test_failed_span_is_dropped_and_order_kept() {
        let mut synth = MockSpeechSynthesizer::new();
        synth
            .expect_audio_urls()
            .returning(|_, _| Err(speech_error("bulk unavailable")));
        synth.expect_audio_url().returning(|text, _| {
            if text.starts_with("Bad") {
                Err(speech_error("rejected"))
            } else {
                Ok(text.to_string())
            }
        });

        let resolver = SpeechUrlResolver::with_chunk_chars(Arc::new(synth), 6);
        let resolution = resolver.resolve("First. Bad. Third.", "en").await;

        assert_eq!(resolution.locations, vec!["First.", "Third."]);
        assert_eq!(resolution.dropped_spans, 1);
    }

    #[tokio::test]
    async fn test_no_locations_from_either_tier() {
        let mut synth = MockSpeechSynthesizer::new();
        synth
            .expect_audio_urls()
            .returning(|_, _| Err(speech_error("bulk unavailable")));
        synth
            .expect_audio_url()
            .returning(|_, _| Err(speech_error("rejected")));

        let resolver = SpeechUrlResolver::new(Arc::new(synth));
        let resolution = resolver.resolve("Anything at all.", "en").await;

        assert!(resolution.is_empty());
        assert_eq!(resolution.dropped_spans, 1);
    }
}
