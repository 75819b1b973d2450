//! Learnify - AI student companion library
//!
//! This library answers learner questions through a language model,
//! condenses the answer into a summary and an example, keeps per-session
//! conversation history and turns answers into spoken audio.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `tutor`: Answer orchestration, summary parsing and the tutor service
//! - `speech`: Text segmentation, speech URL resolution and audio assembly
//! - `session`: Conversation history storage
//! - `providers`: Language provider abstraction and the OpenRouter client
//! - `server`: HTTP routes
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use learnify::{Config, TutorService};
//! use learnify::speech::RequestOrigin;
//! use learnify::tutor::ChatRequest;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let service = TutorService::from_config(&config)?;
//!     let response = service
//!         .ask(ChatRequest::new("Explain gravity"), &RequestOrigin::default())
//!         .await?;
//!     println!("{}", response.text);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod metrics;
pub mod outcome;
pub mod prompts;
pub mod providers;
pub mod server;
pub mod session;
pub mod speech;
pub mod tutor;

// Re-export commonly used types
pub use config::Config;
pub use error::{LearnifyError, Result};
pub use outcome::StageOutcome;
pub use session::{ConversationTurn, InMemorySessionStore, SessionStore};
pub use tutor::{AskResponse, ChatRequest, TutorService};

#[cfg(test)]
pub mod test_utils;
