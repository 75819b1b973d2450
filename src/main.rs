//! Learnify - AI student companion service
//!
#![doc = "Learnify - AI student companion service"]
#![doc = "Main entry point for the Learnify binary."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use learnify::cli::{Cli, Commands};
use learnify::commands;
use learnify::commands::ask::AskOptions;
use learnify::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse first so logging can honor --verbose and --json-logs
    let cli = Cli::parse_args();

    init_tracing(cli.verbose, cli.json_logs);

    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    config.validate()?;

    match cli.command {
        Commands::Serve { .. } => {
            tracing::info!("Starting HTTP service");
            commands::serve::run_serve(config).await?;
            Ok(())
        }
        Commands::Ask {
            question,
            language,
            session,
            no_simplify,
            audio,
        } => {
            tracing::debug!("Asking one-off question in {}", language);
            let options = AskOptions {
                question,
                language,
                session,
                simplify: !no_simplify,
                audio,
            };
            commands::ask::run_ask(config, options).await?;
            Ok(())
        }
    }
}

/// Initialize tracing
///
/// `RUST_LOG` wins when set; otherwise `learnify=info`, or `learnify=debug`
/// with `--verbose`.
fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose { "learnify=debug" } else { "learnify=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
