//! Speech synthesis for tutor answers
//!
//! Answer text is resolved into upstream text-to-speech locations, fetched
//! in order and concatenated into one audio artifact per answer.

pub mod artifact;
pub mod assembler;
pub mod google;
pub mod language;
pub mod pipeline;
pub mod resolver;
pub mod segmenter;

pub use artifact::{AudioArtifact, RequestOrigin};
pub use assembler::{AssemblyReport, AudioAssembler, HostAllowlist};
pub use google::GoogleTranslateTts;
pub use pipeline::AudioPipeline;
pub use resolver::{Resolution, ResolutionTier, SpeechSynthesizer, SpeechUrlResolver};
pub use segmenter::segment;
