pub mod health;
pub mod messages;
pub mod snippets;
pub mod templates;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use snipman_core::CoreError;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(snippets::routes())
        .merge(templates::routes())
        .merge(messages::routes())
        .merge(health::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Manager failure rendered as a JSON error response.
#[derive(Debug)]
pub struct ApiError(pub CoreError);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CoreError::DuplicateName(_) => StatusCode::CONFLICT,
            CoreError::ResourceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            CoreError::Remote(_) => StatusCode::BAD_GATEWAY,
            CoreError::Storage(_) | CoreError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        let reason = match &self.0 {
            CoreError::Validation(e) => Some(e.reason()),
            _ => None,
        };
        let body = ErrorBody {
            error: self.0.message(),
            reason,
        };
        (status, Json(body)).into_response()
    }
}
