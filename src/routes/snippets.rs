use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use snipman_core::{CoreError, Snippet, SnippetId};

use crate::routes::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/snippets",
            get(list_snippets).post(create_snippet).delete(clear_snippets),
        )
        .route(
            "/api/snippets/{id}",
            get(get_snippet).put(save_snippet).delete(delete_snippet),
        )
        .route("/api/snippets/{id}/duplicate", post(duplicate_snippet))
        .route("/api/snippets/{id}/run", post(run_snippet))
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateSnippetRequest {
    pub id: Option<String>,
    pub suffix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DuplicateSnippetRequest {
    pub suffix: Option<String>,
}

#[derive(Serialize)]
struct ClearResponse {
    cleared: bool,
}

#[derive(Serialize)]
struct RunResponse {
    submitted: bool,
}

/// GET /api/snippets - All stored snippets.
async fn list_snippets(State(state): State<AppState>) -> Result<Json<Vec<Snippet>>, ApiError> {
    let snippets = state.manager.local().map_err(|e| state.report(e))?;
    Ok(Json(snippets))
}

/// POST /api/snippets - New snippet from the template, or a copy of a stored one.
/// The body is optional. The result is not saved.
async fn create_snippet(
    State(state): State<AppState>,
    req: Option<Json<CreateSnippetRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let req = req.map(|Json(req)| req).unwrap_or_default();
    let id = req.id.map(SnippetId::from);
    let snippet = state
        .manager
        .create(id.as_ref(), req.suffix.as_deref())
        .await
        .map_err(|e| state.report(e))?;
    Ok((StatusCode::CREATED, Json(snippet)))
}

/// GET /api/snippets/{id}
async fn get_snippet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Snippet>, ApiError> {
    let snippet = find_existing(&state, id).await?;
    Ok(Json(snippet))
}

/// PUT /api/snippets/{id} - Save a snippet. The id in the path wins over the body.
async fn save_snippet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut snippet): Json<Snippet>,
) -> Result<Json<Snippet>, ApiError> {
    snippet.id = SnippetId::from(id);
    let saved = state
        .manager
        .save(snippet)
        .await
        .map_err(|e| state.report(e))?;
    Ok(Json(saved))
}

/// DELETE /api/snippets/{id}
async fn delete_snippet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Snippet>>, ApiError> {
    let snippet = find_existing(&state, id).await?;
    let removed = state
        .manager
        .delete(&snippet)
        .await
        .map_err(|e| state.report(e))?;
    Ok(Json(removed))
}

/// DELETE /api/snippets - Remove every snippet.
async fn clear_snippets(State(state): State<AppState>) -> Result<Json<ClearResponse>, ApiError> {
    let cleared = state.manager.clear().await.map_err(|e| state.report(e))?;
    Ok(Json(ClearResponse { cleared }))
}

/// POST /api/snippets/{id}/duplicate - Unsaved copy with a unique name.
async fn duplicate_snippet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Option<Json<DuplicateSnippetRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let req = req.map(|Json(req)| req).unwrap_or_default();
    let copy = state
        .manager
        .duplicate(&SnippetId::from(id), req.suffix.as_deref())
        .await
        .map_err(|e| state.report(e))?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// POST /api/snippets/{id}/run - Submit a stored snippet for remote execution.
async fn run_snippet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let snippet = find_existing(&state, id).await?;
    let submitted = state
        .manager
        .run(&snippet)
        .await
        .map_err(|e| state.report(e))?;
    state
        .notifier
        .info(&format!("Submitted {} for execution", snippet.name));
    Ok((StatusCode::ACCEPTED, Json(RunResponse { submitted })))
}

async fn find_existing(state: &AppState, id: String) -> Result<Snippet, ApiError> {
    let id = SnippetId::from(id);
    match state.manager.find(&id).await {
        Ok(Some(snippet)) => Ok(snippet),
        Ok(None) => Err(state.report(CoreError::NotFound(id))),
        Err(e) => Err(state.report(e)),
    }
}
