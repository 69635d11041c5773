use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/messages", get(get_messages))
}

#[derive(Serialize)]
struct MessagesResponse {
    errors: Vec<String>,
    info: Vec<String>,
}

/// Errors and info messages recorded for the user so far.
async fn get_messages(State(state): State<AppState>) -> Json<MessagesResponse> {
    Json(MessagesResponse {
        errors: state.notifier.errors(),
        info: state.notifier.info_messages(),
    })
}
