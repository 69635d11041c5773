use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::routes::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/templates", get(get_templates))
}

#[derive(Debug, Deserialize)]
pub struct TemplatesQuery {
    pub location: Option<String>,
    #[serde(default)]
    pub grouped: bool,
}

/// GET /api/templates - Example catalog, flat or grouped for display.
async fn get_templates(
    State(state): State<AppState>,
    Query(query): Query<TemplatesQuery>,
) -> Result<Response, ApiError> {
    let playlist = state
        .manager
        .templates(query.location.as_deref())
        .await
        .map_err(|e| state.report(e))?;

    if query.grouped {
        Ok(Json(playlist.grouped()).into_response())
    } else {
        Ok(Json(playlist).into_response())
    }
}
