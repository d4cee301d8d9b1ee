//! Keyword list API routes (read only).

use crate::api::error::{ApiError, ApiResult};
use crate::db::{self, KeywordList, ListRepository};
use crate::lists::{self, ListSummary};
use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct ListsState {
    pub db_path: Arc<PathBuf>,
}

impl ListsState {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path: Arc::new(db_path),
        }
    }
}

pub fn router(state: ListsState) -> Router {
    Router::new()
        .route("/lists", get(list_summaries))
        .route("/lists/{id}", get(get_list))
        .with_state(state)
}

/// GET /lists - Saved lists, most recently modified first.
async fn list_summaries(State(state): State<ListsState>) -> ApiResult<Json<Vec<ListSummary>>> {
    let conn = db::open_db(&state.db_path)?;
    Ok(Json(lists::summaries(&conn)?))
}

/// GET /lists/{id} - One list with its keywords and flags.
async fn get_list(
    State(state): State<ListsState>,
    Path(id): Path<String>,
) -> ApiResult<Json<KeywordList>> {
    let conn = db::open_db(&state.db_path)?;
    let list = ListRepository::get(&conn, &id)?
        .ok_or_else(|| ApiError::not_found(format!("List {} not found", id)))?;
    Ok(Json(list))
}
