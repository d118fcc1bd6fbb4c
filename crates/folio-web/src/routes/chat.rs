use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;
use folio_core::chat::CHAT_FAILURE_MESSAGE;
use folio_core::model::ChatMessage;
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/chat", post(chat))
}

/// The browser sends the whole conversation so far; the server keeps nothing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
}

async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body?;

    match state.chat.respond(&req.query, &req.conversation_history).await {
        Ok(reply) => Ok(Json(reply).into_response()),
        Err(e) => Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "message": CHAT_FAILURE_MESSAGE,
                "error": e.to_string(),
            })),
        )
            .into_response()),
    }
}
