//! REST API served while a presentation runs.
//!
//! Provides HTTP endpoints for:
//! - Session status and keyword toggles
//! - Listening control and reset
//! - Read access to saved keyword lists

pub mod error;
pub mod routes;

use crate::config::Config;
use crate::session::{SessionCommand, SessionStatusHandle};
use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tracing::info;

pub use routes::lists::ListsState;
pub use routes::session::SessionState;

pub struct ApiServer {
    port: u16,
    session_state: SessionState,
    lists_state: ListsState,
}

impl ApiServer {
    pub fn new(
        tx: mpsc::Sender<SessionCommand>,
        status: SessionStatusHandle,
        config: &Config,
        db_path: PathBuf,
    ) -> Self {
        Self {
            port: config.api.port,
            session_state: SessionState { tx, status },
            lists_state: ListsState::new(db_path),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(service_info))
            .merge(routes::session::router(self.session_state.clone()))
            .merge(routes::lists::router(self.lists_state.clone()))
            .layer(ServiceBuilder::new())
    }

    pub async fn start(self) -> Result<()> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(&format!("127.0.0.1:{}", self.port)).await?;

        info!("API server listening on http://127.0.0.1:{}", self.port);
        info!("Endpoints:");
        info!("  GET  /                    - Service info");
        info!("  GET  /status              - Session status");
        info!("  POST /toggle/{{keyword_id}} - Toggle a keyword");
        info!("  POST /reset               - Reset progress");
        info!("  POST /listen/start        - Start listening");
        info!("  POST /listen/stop         - Stop listening");
        info!("  GET  /lists               - Saved lists");
        info!("  GET  /lists/{{id}}          - One saved list");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn service_info() -> Json<Value> {
    Json(json!({
        "service": "cuecard",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}
