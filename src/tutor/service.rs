//! Tutor session service
//!
//! Composes history, answer generation and audio into the three
//! operations exposed to clients: ask, read history, clear history.

use crate::config::Config;
use crate::error::{LearnifyError, Result};
use crate::metrics;
use crate::outcome::StageOutcome;
use crate::providers::{create_provider, Provider};
use crate::session::{resolve_session_id, ConversationTurn, InMemorySessionStore, SessionStore};
use crate::speech::{AudioArtifact, AudioPipeline, RequestOrigin};
use crate::tutor::orchestrator::{AnswerOptions, PromptOrchestrator};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

fn default_true() -> bool {
    true
}

fn default_language() -> String {
    "English".to_string()
}

/// Body of an ask request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The learner's question; required and non-blank
    #[serde(default)]
    pub question: Option<String>,

    /// Model override
    #[serde(default)]
    pub model: Option<String>,

    /// Temperature override for the primary answer
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Whether to produce a summary and example
    #[serde(default = "default_true")]
    pub simplify: bool,

    /// Human-readable answer language
    #[serde(default = "default_language")]
    pub language: String,

    /// Whether to produce an audio artifact
    #[serde(default = "default_true")]
    pub play_audio: bool,

    /// Conversation to continue; the shared default session when absent
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// A request with default options
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
            ..Self::default()
        }
    }
}

impl Default for ChatRequest {
    fn default() -> Self {
        Self {
            question: None,
            model: None,
            temperature: None,
            simplify: true,
            language: default_language(),
            play_audio: true,
            session_id: None,
        }
    }
}

/// Where a client can fetch the answer audio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioReference {
    /// Public URL of the stored artifact
    pub url: String,
}

/// Result of a successful ask
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    /// Primary answer
    pub text: String,
    /// Short summary, if produced
    pub summary: Option<String>,
    /// Real-world example, if produced
    pub example: Option<String>,
    /// Audio location, if produced
    pub audio: Option<AudioReference>,
    /// Session the turns were recorded in
    pub session_id: String,
    /// Outcome of the summary stage
    #[serde(skip)]
    pub simplify_outcome: StageOutcome<()>,
    /// Outcome of the audio stage
    #[serde(skip)]
    pub audio_outcome: StageOutcome<AudioArtifact>,
}

/// The tutor service
pub struct TutorService {
    provider: Arc<dyn Provider>,
    orchestrator: PromptOrchestrator,
    store: Arc<dyn SessionStore>,
    audio: AudioPipeline,
    default_model: String,
    default_temperature: f32,
    window_size: usize,
}

impl TutorService {
    /// Assemble a service from its collaborators
    pub fn new(
        config: &Config,
        provider: Arc<dyn Provider>,
        store: Arc<dyn SessionStore>,
        audio: AudioPipeline,
    ) -> Self {
        Self {
            orchestrator: PromptOrchestrator::new(
                Arc::clone(&provider),
                config.provider.simplify_temperature,
            ),
            provider,
            store,
            audio,
            default_model: config.provider.openrouter.model.clone(),
            default_temperature: config.provider.openrouter.temperature,
            window_size: config.session.window_size,
        }
    }

    /// Build the production service: OpenRouter, in-memory history and
    /// Google text-to-speech
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be created
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = create_provider(&config.provider)?;
        if !provider.is_configured() {
            tracing::error!("{} not set; ask requests will fail", provider.credential_name());
        }

        Ok(Self::new(
            config,
            provider,
            Arc::new(InMemorySessionStore::new()),
            AudioPipeline::from_config(config)?,
        ))
    }

    /// Directory audio artifacts are written to
    pub fn audio_dir(&self) -> &Path {
        self.audio.output_dir()
    }

    /// Answer a question, record the exchange and optionally produce audio
    ///
    /// # Errors
    ///
    /// Returns `LearnifyError::MissingCredentials` when the provider has no
    /// credential, `LearnifyError::Validation` for a missing or blank
    /// question, and the provider error when the primary answer fails. The
    /// summary and audio stages never fail the call.
    pub async fn ask(&self, request: ChatRequest, origin: &RequestOrigin) -> Result<AskResponse> {
        if !self.provider.is_configured() {
            metrics::record_ask("unconfigured");
            return Err(
                LearnifyError::MissingCredentials(self.provider.credential_name().to_string()).into(),
            );
        }

        let question = match request.question {
            Some(ref question) if !question.trim().is_empty() => question.clone(),
            _ => {
                metrics::record_ask("invalid");
                return Err(LearnifyError::Validation("question is required".to_string()).into());
            }
        };

        let session_id = resolve_session_id(request.session_id.as_deref());
        let history = self.store.recent_window(&session_id, self.window_size).await;
        self.store
            .append(&session_id, ConversationTurn::user(question.clone()))
            .await;

        let options = AnswerOptions {
            model: request
                .model
                .clone()
                .filter(|model| !model.trim().is_empty())
                .unwrap_or_else(|| self.default_model.clone()),
            temperature: request.temperature.unwrap_or(self.default_temperature),
            simplify: request.simplify,
            language: request.language.clone(),
        };

        let answer = match self.orchestrator.answer(&question, &history, &options).await {
            Ok(answer) => answer,
            Err(e) => {
                metrics::record_ask("provider_error");
                return Err(e);
            }
        };
        metrics::record_simplify(answer.simplify.label());

        self.store
            .append(&session_id, ConversationTurn::assistant(answer.text.clone()))
            .await;

        let audio_outcome = if request.play_audio {
            self.audio
                .synthesize(answer.speech_text(), &request.language, origin)
                .await
        } else {
            StageOutcome::Skipped
        };
        metrics::record_artifact(audio_outcome.label());

        tracing::info!(
            "Answered question in session {} (simplify: {}, audio: {})",
            session_id,
            answer.simplify.label(),
            audio_outcome.label()
        );
        metrics::record_ask("ok");

        Ok(AskResponse {
            audio: audio_outcome.as_completed().map(|artifact| AudioReference {
                url: artifact.url.clone(),
            }),
            text: answer.text,
            summary: answer.summary,
            example: answer.example,
            session_id,
            simplify_outcome: answer.simplify,
            audio_outcome,
        })
    }

    /// Full history of a session (the default session when `None` or empty)
    pub async fn get_history(&self, session_id: Option<&str>) -> Vec<ConversationTurn> {
        self.store.get(&resolve_session_id(session_id)).await
    }

    /// Reset a session to empty; clearing an empty session is a no-op
    pub async fn clear_history(&self, session_id: Option<&str>) {
        let session_id = resolve_session_id(session_id);
        self.store.clear(&session_id).await;
    }
}
