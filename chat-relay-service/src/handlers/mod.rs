//! HTTP handlers for the chat relay.

use crate::models::ChatRequest;
use crate::startup::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Body returned when the request carries no usable prompt.
pub const MISSING_PROMPT_BODY: &str = "Prompt is required.";

/// Body returned for any provider failure. Detail stays in the log.
pub const PROVIDER_FAILURE_BODY: &str =
    "Error processing request. Check server logs for details.";

/// Relay boundary: validate the prompt, call the provider once, map the
/// outcome to a status. Provider error detail never reaches the caller.
pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Response {
    let Some(prompt) = request.prompt() else {
        return (StatusCode::BAD_REQUEST, MISSING_PROMPT_BODY).into_response();
    };

    let history = request.history();

    match state.provider.generate_reply(prompt, &history).await {
        Ok(text) => (StatusCode::OK, text).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Provider call failed");
            (StatusCode::INTERNAL_SERVER_ERROR, PROVIDER_FAILURE_BODY).into_response()
        }
    }
}

/// Liveness probe. Never touches the provider.
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "chat-relay-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
