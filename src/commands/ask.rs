//! One-shot question command

use crate::config::Config;
use crate::error::Result;
use crate::outcome::StageOutcome;
use crate::speech::RequestOrigin;
use crate::tutor::{AskResponse, ChatRequest, TutorService};
use colored::Colorize;

/// Options for a terminal question
#[derive(Debug, Clone)]
pub struct AskOptions {
    /// The learner's question
    pub question: String,
    /// Language to answer in
    pub language: String,
    /// Session to continue; the shared default session when `None`
    pub session: Option<String>,
    /// Whether to request a summary and example
    pub simplify: bool,
    /// Whether to write an audio file
    pub audio: bool,
}

/// Ask one question and print the answer
///
/// # Errors
///
/// Returns error if the provider is not configured, the question is blank
/// or the primary answer fails
pub async fn run_ask(config: Config, options: AskOptions) -> Result<()> {
    if options.audio {
        tokio::fs::create_dir_all(&config.audio.output_dir).await?;
    }

    let service = TutorService::from_config(&config)?;
    let request = ChatRequest {
        question: Some(options.question),
        simplify: options.simplify,
        language: options.language,
        play_audio: options.audio,
        session_id: options.session,
        ..ChatRequest::default()
    };

    let origin = RequestOrigin::new(
        "http",
        format!("{}:{}", config.server.host, config.server.port),
    );
    let response = service.ask(request, &origin).await?;
    print_response(&response);

    Ok(())
}

fn print_response(response: &AskResponse) {
    println!("{}", response.text);

    if let Some(summary) = &response.summary {
        println!("\n{}", "Summary".bold().cyan());
        println!("{}", summary);
    }
    if let Some(example) = &response.example {
        println!("\n{}", "Example".bold().cyan());
        println!("{}", example);
    }

    if let StageOutcome::Degraded { reason } = &response.simplify_outcome {
        println!("\n{}", format!("Summary unavailable: {}", reason).yellow());
    }

    match &response.audio_outcome {
        StageOutcome::Completed(artifact) => {
            println!(
                "\n{} {}",
                "Audio:".bold().green(),
                artifact.path.display()
            );
        }
        StageOutcome::Degraded { reason } => {
            println!("\n{}", format!("Audio unavailable: {}", reason).yellow());
        }
        StageOutcome::Skipped => {}
    }
}
