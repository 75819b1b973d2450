//! Command-line interface definition for Learnify
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands to run the HTTP service and to ask one-off questions.

use clap::{Parser, Subcommand};

/// Learnify - AI student companion service
///
/// Answers learner questions with a summary, a real-world example and
/// optional spoken audio.
#[derive(Parser, Debug, Clone)]
#[command(name = "learnify")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Learnify
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP service
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask a single question and print the answer
    Ask {
        /// The question to ask
        question: String,

        /// Answer language (English, Hindi, Spanish, French, Chinese)
        #[arg(short, long, default_value = "English")]
        language: String,

        /// Session to continue
        #[arg(short, long)]
        session: Option<String>,

        /// Skip the summary and example
        #[arg(long)]
        no_simplify: bool,

        /// Also produce an audio file
        #[arg(long)]
        audio: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            json_logs: false,
            command: Commands::Serve {
                host: None,
                port: None,
            },
        }
    }
}
