// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use tanjiro_agent::{Direction, ReplyKind, TurnReply};
use tanjiro_core::TanjiroError;
use tanjiro_core::types::{MemeImage, SessionId, Turn};

use crate::page;
use crate::server::GatewayState;

/// Request body for POST /v1/messages.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    /// Message content text.
    pub content: String,
    /// Session to continue. Absent or unknown ids open a new session.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Reply body for messages and meme navigation.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub session_id: SessionId,
    pub kind: ReplyKind,
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<MemeImage>,
}

impl MessageResponse {
    fn new(session_id: SessionId, reply: TurnReply) -> Self {
        Self {
            session_id,
            kind: reply.kind,
            reply: reply.text,
            image: reply.image,
        }
    }
}

/// Response body for POST /v1/sessions.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: SessionId,
}

/// Response body for GET /v1/sessions/{id}/history.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: SessionId,
    pub turns: Vec<Turn>,
    pub interests: Vec<String>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub sessions: usize,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An error status with a JSON `{error}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn unknown_session(id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("unknown session: {id}"),
        }
    }
}

impl From<TanjiroError> for ApiError {
    fn from(err: TanjiroError) -> Self {
        let status = match &err {
            TanjiroError::SessionLimit { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => {
                error!(error = %err, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

/// GET /health
pub async fn health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        sessions: state.sessions.len(),
    })
}

/// POST /v1/sessions
pub async fn create_session(
    State(state): State<GatewayState>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let (session_id, _) = state.sessions.create()?;
    Ok((StatusCode::CREATED, Json(SessionResponse { session_id })))
}

/// POST /v1/messages
///
/// Runs one turn. The session lock is held until the reply is ready.
pub async fn post_message(
    State(state): State<GatewayState>,
    Json(body): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if body.content.trim().is_empty() {
        return Err(ApiError::bad_request("message content must not be empty"));
    }

    let (session_id, handle) = state.sessions.get_or_create(body.session_id.as_deref())?;
    let mut session = handle.lock().await;
    let reply = state.router.handle(&mut session, &body.content).await;
    debug!(session_id = %session_id, kind = %reply.kind, "turn handled");

    Ok(Json(MessageResponse::new(session_id, reply)))
}

/// POST /v1/sessions/{id}/memes/next
pub async fn next_meme(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    navigate(&state, &id, Direction::Next).await
}

/// POST /v1/sessions/{id}/memes/previous
pub async fn previous_meme(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    navigate(&state, &id, Direction::Previous).await
}

async fn navigate(
    state: &GatewayState,
    id: &str,
    direction: Direction,
) -> Result<Json<MessageResponse>, ApiError> {
    let handle = state
        .sessions
        .get(id)
        .ok_or_else(|| ApiError::unknown_session(id))?;
    let mut session = handle.lock().await;
    let reply = state.router.navigate(&mut session, direction);
    Ok(Json(MessageResponse::new(SessionId(id.to_string()), reply)))
}

/// GET /v1/sessions/{id}/history
pub async fn get_history(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let handle = state
        .sessions
        .get(&id)
        .ok_or_else(|| ApiError::unknown_session(&id))?;
    let session = handle.lock().await;

    Ok(Json(HistoryResponse {
        session_id: SessionId(id),
        turns: session.memory.turns(),
        interests: session.interests.iter().map(str::to_string).collect(),
    }))
}

/// DELETE /v1/sessions/{id}
pub async fn delete_session(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::unknown_session(&id))
    }
}
