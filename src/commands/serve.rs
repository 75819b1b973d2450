//! HTTP service command

use crate::config::Config;
use crate::error::{LearnifyError, Result};
use crate::server;
use crate::tutor::TutorService;
use std::sync::Arc;

/// Run the HTTP service until interrupted
///
/// # Arguments
///
/// * `config` - Loaded configuration, CLI overrides already applied
///
/// # Errors
///
/// Returns error if the audio directory cannot be created or the listener
/// cannot be bound
pub async fn run_serve(config: Config) -> Result<()> {
    if !config.has_provider_credentials() {
        tracing::error!("OPENROUTER_API_KEY not set; questions will fail until it is configured");
    }

    tokio::fs::create_dir_all(&config.audio.output_dir).await?;
    crate::metrics::init_metrics_exporter();

    let service = Arc::new(TutorService::from_config(&config)?);
    let app = server::router(service, &config.audio.public_prefix);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LearnifyError::Config(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(
        "Learnify listening on http://{} (audio at {} from {})",
        addr,
        config.audio.public_prefix,
        config.audio.output_dir.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Learnify stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
