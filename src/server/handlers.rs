//! Request handlers for the tutor API

use crate::server::error::ApiError;
use crate::server::AppState;
use crate::session::ConversationTurn;
use crate::speech::RequestOrigin;
use crate::tutor::{AskResponse, ChatRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Successful ask body: the answer fields plus `ok: true`
#[derive(Debug, Serialize)]
pub struct AskReply {
    ok: bool,
    #[serde(flatten)]
    response: AskResponse,
}

/// History body: `ok: true` plus the session's turns, oldest first
#[derive(Debug, Serialize)]
pub struct HistoryReply {
    ok: bool,
    history: Vec<ConversationTurn>,
}

/// Bare `{ "ok": true }` acknowledgement
#[derive(Debug, Serialize)]
pub struct OkReply {
    ok: bool,
}

impl OkReply {
    fn ok() -> Json<Self> {
        Json(Self { ok: true })
    }
}

/// Session selector shared by the history query and the clear body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionParams {
    #[serde(default)]
    session_id: Option<String>,
}

/// `POST /api/learnify`
pub async fn ask(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<AskReply>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected ask body: {}", rejection);
        ApiError::bad_request(rejection.body_text())
    })?;

    let origin = RequestOrigin::from_headers(&headers);
    let response = state.service.ask(request, &origin).await?;

    Ok(Json(AskReply { ok: true, response }))
}

/// `GET /api/learnify/history?sessionId=`
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<SessionParams>,
) -> Json<HistoryReply> {
    let history = state.service.get_history(params.session_id.as_deref()).await;
    Json(HistoryReply { ok: true, history })
}

/// `POST /api/learnify/clear`
///
/// The body is optional; without one the default session is cleared.
pub async fn clear(
    State(state): State<AppState>,
    payload: Option<Json<SessionParams>>,
) -> Json<OkReply> {
    let params = payload.map(|Json(params)| params).unwrap_or_default();
    state.service.clear_history(params.session_id.as_deref()).await;
    OkReply::ok()
}

/// `GET /health`
pub async fn health() -> Json<OkReply> {
    OkReply::ok()
}
