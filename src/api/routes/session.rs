//! Presentation session endpoints.
//!
//! Provides HTTP endpoints for:
//! - Session status (GET /status)
//! - Manual keyword toggle (POST /toggle/{keyword_id})
//! - Reset (POST /reset)
//! - Listening control (POST /listen/start, POST /listen/stop)

use crate::api::error::{ApiError, ApiResult};
use crate::session::{SessionCommand, SessionStatus, SessionStatusHandle};
use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

/// How long a handler waits for the session loop before reading status back.
const COMMAND_SETTLE: Duration = Duration::from_millis(100);

#[derive(Clone)]
pub struct SessionState {
    pub tx: mpsc::Sender<SessionCommand>,
    pub status: SessionStatusHandle,
}

pub fn router(state: SessionState) -> Router {
    Router::new()
        .route("/status", get(session_status))
        .route("/toggle/{keyword_id}", post(toggle_keyword))
        .route("/reset", post(reset))
        .route("/listen/start", post(start_listening))
        .route("/listen/stop", post(stop_listening))
        .with_state(state)
}

async fn session_status(State(state): State<SessionState>) -> Json<SessionStatus> {
    Json(state.status.get().await)
}

/// Flip one keyword's flag by hand. Unknown ids are rejected before the
/// session sees them.
async fn toggle_keyword(
    State(state): State<SessionState>,
    Path(keyword_id): Path<String>,
) -> ApiResult<Json<Value>> {
    if !state.status.get().await.has_keyword(&keyword_id) {
        return Err(ApiError::not_found(format!(
            "Keyword {} not found in current list",
            keyword_id
        )));
    }

    info!("Keyword toggle received via API: {}", keyword_id);
    let status = dispatch(&state, SessionCommand::ToggleKeyword(keyword_id.clone())).await?;
    let checked = status
        .keywords
        .iter()
        .find(|k| k.id == keyword_id)
        .map(|k| k.checked);

    Ok(Json(json!({
        "success": true,
        "keyword_id": keyword_id,
        "checked": checked,
        "status": status,
    })))
}

async fn reset(State(state): State<SessionState>) -> ApiResult<Json<Value>> {
    info!("Reset received via API");
    let status = dispatch(&state, SessionCommand::Reset).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Session reset",
        "status": status,
    })))
}

async fn start_listening(State(state): State<SessionState>) -> ApiResult<Json<Value>> {
    info!("Listen start received via API");
    let status = dispatch(&state, SessionCommand::StartListening).await?;
    Ok(Json(json!({
        "success": true,
        "engine": status.engine,
        "status": status,
    })))
}

async fn stop_listening(State(state): State<SessionState>) -> ApiResult<Json<Value>> {
    info!("Listen stop received via API");
    let status = dispatch(&state, SessionCommand::StopListening).await?;
    Ok(Json(json!({
        "success": true,
        "engine": status.engine,
        "status": status,
    })))
}

async fn dispatch(state: &SessionState, command: SessionCommand) -> ApiResult<SessionStatus> {
    if let Err(e) = state.tx.send(command).await {
        error!("Failed to send session command: {}", e);
        return Err(ApiError::unavailable("Presentation session is not running"));
    }

    tokio::time::sleep(COMMAND_SETTLE).await;
    Ok(state.status.get().await)
}
