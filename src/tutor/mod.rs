//! Tutor answers and sessions
//!
//! - `parse`: summary and example extraction
//! - `orchestrator`: primary answer and summary follow-up
//! - `service`: ask, history and clear operations

pub mod orchestrator;
pub mod parse;
pub mod service;

pub use orchestrator::{AnswerOptions, PromptOrchestrator, TutorAnswer};
pub use parse::{parse_simplified, Simplified};
pub use service::{AskResponse, AudioReference, ChatRequest, TutorService};
