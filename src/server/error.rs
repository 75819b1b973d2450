//! Mapping of service errors to HTTP responses

use crate::error::LearnifyError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Error returned by HTTP handlers
///
/// Configuration problems are reported as 500 with the error text,
/// validation problems as 400, everything else as 500 `server error` with
/// the underlying message in `detail`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    detail: Option<String>,
}

impl ApiError {
    /// A 400 response with the given message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: message.into(),
            detail: None,
        }
    }

    /// Status code this error maps to
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<LearnifyError>() {
            Some(e) if e.is_configuration() => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: e.to_string(),
                detail: None,
            },
            Some(LearnifyError::Validation(message)) => Self::bad_request(message.clone()),
            _ => {
                tracing::error!("Request failed: {:#}", err);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: "server error".to_string(),
                    detail: Some(err.to_string()),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.detail {
            Some(detail) => json!({ "ok": false, "error": self.error, "detail": detail }),
            None => json!({ "ok": false, "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}
