//! Two-stage answer generation
//!
//! The primary stage answers the question with recent history as context.
//! The optional follow-up stage condenses that answer into a summary and
//! an example. Only the primary stage can fail the call.

use crate::error::Result;
use crate::outcome::StageOutcome;
use crate::prompts::{build_simplify_prompt, build_system_prompt};
use crate::providers::{Message, Provider};
use crate::session::ConversationTurn;
use crate::tutor::parse::parse_simplified;
use std::sync::Arc;

/// Answer used when the model returns nothing
pub const EMPTY_ANSWER: &str = "No response.";

/// Per-call generation settings
#[derive(Debug, Clone)]
pub struct AnswerOptions {
    /// Model identifier
    pub model: String,
    /// Temperature for the primary answer
    pub temperature: f32,
    /// Whether to run the summary follow-up
    pub simplify: bool,
    /// Language the answer is written in
    pub language: String,
}

/// Output of one orchestrated answer
#[derive(Debug, Clone, PartialEq)]
pub struct TutorAnswer {
    /// Primary answer
    pub text: String,
    /// Short summary, when the follow-up produced one
    pub summary: Option<String>,
    /// Real-world example, when the follow-up produced one
    pub example: Option<String>,
    /// What happened to the follow-up stage
    pub simplify: StageOutcome<()>,
}

impl TutorAnswer {
    /// Text to speak: the summary when present, otherwise the full answer
    pub fn speech_text(&self) -> &str {
        self.summary.as_deref().unwrap_or(&self.text)
    }
}

/// Drives the language provider through the answer stages
pub struct PromptOrchestrator {
    provider: Arc<dyn Provider>,
    simplify_temperature: f32,
}

impl PromptOrchestrator {
    /// Create an orchestrator
    ///
    /// # Arguments
    ///
    /// * `provider` - Language provider for both stages
    /// * `simplify_temperature` - Temperature for the summary follow-up
    pub fn new(provider: Arc<dyn Provider>, simplify_temperature: f32) -> Self {
        Self {
            provider,
            simplify_temperature,
        }
    }

    /// Answer a question given the recent history window
    ///
    /// # Arguments
    ///
    /// * `question` - The learner's question
    /// * `history` - Recent turns, oldest first
    /// * `options` - Model, temperature, language and follow-up switch
    ///
    /// # Errors
    ///
    /// Returns the provider error if the primary stage fails
    pub async fn answer(
        &self,
        question: &str,
        history: &[ConversationTurn],
        options: &AnswerOptions,
    ) -> Result<TutorAnswer> {
        let system_prompt = build_system_prompt(&options.language);

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(system_prompt.clone()));
        messages.extend(history.iter().map(ConversationTurn::to_message));
        messages.push(Message::user(question));

        tracing::debug!(
            "Requesting answer from {} with {} history turns",
            options.model,
            history.len()
        );
        let response = self
            .provider
            .complete(&options.model, &messages, options.temperature)
            .await
            .map_err(|e| {
                tracing::error!("Primary answer failed: {}", e);
                e
            })?;

        let text = match response.text() {
            "" => EMPTY_ANSWER.to_string(),
            text => text.to_string(),
        };

        if !options.simplify {
            return Ok(TutorAnswer {
                text,
                summary: None,
                example: None,
                simplify: StageOutcome::Skipped,
            });
        }

        let follow_up = [
            Message::system(system_prompt),
            Message::user(build_simplify_prompt(&options.language, &text)),
        ];

        match self
            .provider
            .complete(&options.model, &follow_up, self.simplify_temperature)
            .await
        {
            Ok(response) => {
                let parsed = parse_simplified(response.text());
                Ok(TutorAnswer {
                    text,
                    summary: parsed.summary,
                    example: parsed.example,
                    simplify: StageOutcome::Completed(()),
                })
            }
            Err(e) => {
                tracing::warn!("Simplify follow-up failed: {}", e);
                Ok(TutorAnswer {
                    text,
                    summary: None,
                    example: None,
                    simplify: StageOutcome::degraded(e),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_error_contains, ScriptedProvider};

    fn options(simplify: bool) -> AnswerOptions {
        AnswerOptions {
            model: "test-model".to_string(),
            temperature: 0.5,
            simplify,
            language: "English".to_string(),
        }
    }

    #[tokio::test]
    async fn test_primary_only() {
        let provider = Arc::new(ScriptedProvider::new().respond("Gravity pulls."));
        let orchestrator = PromptOrchestrator::new(provider.clone(), 0.2);

        let answer = orchestrator
            .answer("Explain gravity", &[], &options(false))
            .await
            .unwrap();

        assert_eq!(answer.text, "Gravity pulls.");
        assert_eq!(answer.summary, None);
        assert!(answer.simplify.is_skipped());
        assert_eq!(answer.speech_text(), "Gravity pulls.");

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "test-model");
        assert_eq!(calls[0].temperature, 0.5);
        assert_eq!(calls[0].messages[0].role, "system");
        assert_eq!(calls[0].messages.last().unwrap(), &Message::user("Explain gravity"));
    }

    #[tokio::test]
    async fn test_history_is_placed_between_system_and_question() {
        let provider = Arc::new(ScriptedProvider::new().respond("Yes."));
        let orchestrator = PromptOrchestrator::new(provider.clone(), 0.2);
        let history = vec![
            ConversationTurn::user("What is mass?"),
            ConversationTurn::assistant("Amount of matter."),
        ];

        orchestrator
            .answer("And weight?", &history, &options(false))
            .await
            .unwrap();

        let messages = &provider.calls()[0].messages;
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1], Message::user("What is mass?"));
        assert_eq!(messages[2], Message::assistant("Amount of matter."));
        assert_eq!(messages[3], Message::user("And weight?"));
    }

    #[tokio::test]
    async fn test_simplify_produces_summary_and_example() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .respond("Long answer about gravity.")
                .respond("Gravity attracts.\n\nAn apple falls."),
        );
        let orchestrator = PromptOrchestrator::new(provider.clone(), 0.2);

        let answer = orchestrator
            .answer("Explain gravity", &[], &options(true))
            .await
            .unwrap();

        assert_eq!(answer.summary.as_deref(), Some("Gravity attracts."));
        assert_eq!(answer.example.as_deref(), Some("An apple falls."));
        assert!(answer.simplify.is_completed());
        assert_eq!(answer.speech_text(), "Gravity attracts.");

        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].temperature, 0.2);
        assert_eq!(calls[1].messages.len(), 2);
        assert!(calls[1].messages[1]
            .content
            .ends_with("Answer: Long answer about gravity."));
    }

    #[tokio::test]
    async fn test_simplify_failure_degrades() {
        let provider = Arc::new(ScriptedProvider::new().respond("Answer.").fail("rate limited"));
        let orchestrator = PromptOrchestrator::new(provider, 0.2);

        let answer = orchestrator.answer("Q", &[], &options(true)).await.unwrap();

        assert_eq!(answer.text, "Answer.");
        assert_eq!(answer.summary, None);
        assert_eq!(answer.example, None);
        assert!(answer.simplify.is_degraded());
    }

    #[tokio::test]
    async fn test_empty_primary_answer_is_replaced() {
        let provider = Arc::new(ScriptedProvider::new().respond("   "));
        let orchestrator = PromptOrchestrator::new(provider, 0.2);

        let answer = orchestrator.answer("Q", &[], &options(false)).await.unwrap();
        assert_eq!(answer.text, EMPTY_ANSWER);
    }

    #[tokio::test]
    async fn test_empty_follow_up_yields_no_summary() {
        let provider = Arc::new(ScriptedProvider::new().respond("Answer.").respond(""));
        let orchestrator = PromptOrchestrator::new(provider, 0.2);

        let answer = orchestrator.answer("Q", &[], &options(true)).await.unwrap();
        assert!(answer.simplify.is_completed());
        assert_eq!(answer.summary, None);
        assert_eq!(answer.speech_text(), "Answer.");
    }

    #[tokio::test]
    async fn test_primary_failure_is_fatal() {
        let provider = Arc::new(ScriptedProvider::new().fail("upstream down"));
        let orchestrator = PromptOrchestrator::new(provider, 0.2);

        assert_error_contains(
            orchestrator.answer("Q", &[], &options(true)).await,
            "upstream down",
        );
    }
}
