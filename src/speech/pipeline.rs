//! Text to audio artifact pipeline
//!
//! Resolves text into upstream locations, names a fresh artifact and
//! assembles the chunks into it. Every failure here is non-fatal for the
//! caller and comes back as a degraded outcome.

use crate::config::Config;
use crate::error::Result;
use crate::outcome::StageOutcome;
use crate::speech::artifact::{make_filename, AudioArtifact, RequestOrigin};
use crate::speech::assembler::{AudioAssembler, HostAllowlist};
use crate::speech::google::GoogleTranslateTts;
use crate::speech::language::language_code;
use crate::speech::resolver::{SpeechSynthesizer, SpeechUrlResolver};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Speech resolution, naming and assembly for one answer
#[derive(Clone)]
pub struct AudioPipeline {
    resolver: SpeechUrlResolver,
    assembler: AudioAssembler,
    output_dir: PathBuf,
    public_prefix: String,
    filename_prefix: String,
    extension: String,
}

impl AudioPipeline {
    /// Build the pipeline described by the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the chunk fetch client cannot be created
    pub fn from_config(config: &Config) -> Result<Self> {
        let synthesizer: Arc<dyn SpeechSynthesizer> = Arc::new(GoogleTranslateTts::new(
            config.speech.tts_host.clone(),
            config.speech.slow,
        ));
        Self::with_synthesizer(config, synthesizer)
    }

    /// Build the pipeline around a specific synthesizer
    ///
    /// # Errors
    ///
    /// Returns error if the chunk fetch client cannot be created
    pub fn with_synthesizer(config: &Config, synthesizer: Arc<dyn SpeechSynthesizer>) -> Result<Self> {
        let assembler = AudioAssembler::new(
            HostAllowlist::new(&config.speech.allowed_hosts),
            Duration::from_secs(config.speech.fetch_timeout_seconds),
            config.speech.max_redirects,
        )?;

        Ok(Self {
            resolver: SpeechUrlResolver::with_chunk_chars(synthesizer, config.speech.chunk_chars),
            assembler,
            output_dir: config.audio.output_dir.clone(),
            public_prefix: config.audio.public_prefix.clone(),
            filename_prefix: config.audio.filename_prefix.clone(),
            extension: config.audio.extension.clone(),
        })
    }

    /// Directory artifacts are written to
    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    /// Produce one audio artifact for `text` spoken in `language`
    ///
    /// Blank text is skipped. No resolvable location, an unusable output
    /// directory, or zero fetched chunks all degrade the stage.
    pub async fn synthesize(
        &self,
        text: &str,
        language: &str,
        origin: &RequestOrigin,
    ) -> StageOutcome<AudioArtifact> {
        if text.trim().is_empty() {
            return StageOutcome::Skipped;
        }

        let code = language_code(language);
        let resolution = self.resolver.resolve(text, code).await;
        if resolution.is_empty() {
            tracing::warn!("No audio locations resolved for language {}", code);
            return StageOutcome::degraded("no audio locations resolved");
        }
        tracing::debug!(
            "Resolved {} audio locations ({:?}, {} dropped)",
            resolution.locations.len(),
            resolution.tier,
            resolution.dropped_spans
        );

        let filename = make_filename(&self.filename_prefix, &self.extension);
        let destination = self.output_dir.join(&filename);

        let report = match self.assembler.assemble(&resolution.locations, &destination).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!("Audio assembly failed: {}", e);
                return StageOutcome::degraded(format!("audio assembly failed: {}", e));
            }
        };

        if report.is_empty() {
            tracing::warn!("No audio chunks could be fetched");
            return StageOutcome::degraded("no audio available");
        }

        tracing::info!(
            "Wrote audio {} ({} bytes, {} of {} chunks)",
            filename,
            report.bytes_written,
            report.written.len(),
            resolution.locations.len()
        );

        StageOutcome::Completed(AudioArtifact {
            url: origin.public_url(&self.public_prefix, &filename),
            filename,
            path: destination,
            bytes: report.bytes_written,
            chunks_written: report.written.len(),
            chunks_failed: report.failed.len(),
        })
    }
}
