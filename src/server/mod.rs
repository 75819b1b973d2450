//! HTTP interface
//!
//! Routes:
//!
//! - `POST /api/learnify`: ask a question
//! - `GET /api/learnify/history?sessionId=`: read a session
//! - `POST /api/learnify/clear`: reset a session
//! - `GET /health`: liveness
//! - `GET {audio.public_prefix}/*`: stored audio files

pub mod error;
pub mod handlers;

use crate::tutor::TutorService;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TutorService>,
}

/// Build the application router
///
/// # Arguments
///
/// * `service` - The tutor service backing the API
/// * `public_prefix` - URL prefix the audio directory is served under
pub fn router(service: Arc<TutorService>, public_prefix: &str) -> Router {
    let audio = ServeDir::new(service.audio_dir());
    let state = AppState { service };

    let api = Router::new()
        .route("/api/learnify", post(handlers::ask))
        .route("/api/learnify/history", get(handlers::history))
        .route("/api/learnify/clear", post(handlers::clear))
        .route("/health", get(handlers::health))
        .with_state(state);

    let prefix = public_prefix.trim_matches('/');
    let app = if prefix.is_empty() {
        api.fallback_service(audio)
    } else {
        api.nest_service(&format!("/{}", prefix), audio)
    };

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
