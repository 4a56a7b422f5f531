//! The `/api/chat` endpoint.
//!
//! Receives a visitor message plus optional conversation history, walks
//! the model candidate list until one answers, and returns a uniform JSON
//! envelope. HTTP 4xx is reserved for requests the client itself can fix;
//! upstream trouble degrades to a 200 with `ok: false` and a diagnostic.

use std::sync::Arc;
use std::time::Instant;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    error::AppError,
    prompt::{self, HistoryTurn},
    provider, AppState,
};

/// Fixed diagnostic returned while no API key is configured.
const NOT_CONFIGURED: &str =
    "The chat service is not configured. Set GEMINI_API_KEY and restart the server.";

/// Chat request body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<HistoryTurn>,
}

/// Uniform chat response envelope.
///
/// `reply` and `response` carry the same text; older site scripts read
/// one key, newer ones the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub response: String,
    pub ok: bool,
}

impl ChatResponse {
    fn success(text: String) -> Self {
        Self {
            reply: text.clone(),
            response: text,
            ok: true,
        }
    }

    fn failure(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            reply: text.clone(),
            response: text,
            ok: false,
        }
    }
}

/// Body of the `GET /api/chat` discovery probe.
#[derive(Debug, Serialize)]
pub struct ChatStatus {
    pub ok: bool,
    pub message: &'static str,
}

/// Discovery probe; answers without touching the upstream service.
pub async fn chat_status() -> Json<ChatStatus> {
    Json(ChatStatus {
        ok: true,
        message: "POST a JSON body like {\"message\": \"...\"} to talk to the assistant.",
    })
}

/// CORS preflight for the chat path.
pub async fn chat_preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Handle a chat request.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ChatResponse>, AppError> {
    if body.is_empty() {
        return Err(AppError::BadRequest("Request body is empty".to_string()));
    }

    let request: ChatRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;

    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("No message provided".to_string()));
    }

    Ok(Json(answer(&state, message, &request.history).await))
}

/// Produce the envelope for a validated request. Infallible by design:
/// configuration gaps and upstream failures both fold into `ok: false`.
async fn answer(state: &AppState, message: &str, history: &[HistoryTurn]) -> ChatResponse {
    let Some(backend) = &state.backend else {
        return ChatResponse::failure(NOT_CONFIGURED);
    };

    let started = Instant::now();
    let request = prompt::build_request(history, message);

    match provider::generate_with_fallback(backend.as_ref(), &state.candidates, &request).await {
        Ok(reply) => {
            info!(
                duration_ms = started.elapsed().as_millis() as u64,
                history_turns = history.len(),
                "chat reply generated"
            );
            ChatResponse::success(reply)
        }
        Err(err) => {
            error!(error = %err, "all model candidates failed");
            ChatResponse::failure(format!("Service error: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_populates_both_reply_keys() {
        let ok = ChatResponse::success("hello".to_string());
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["reply"], json["response"]);
        assert_eq!(json["ok"], true);

        let failed = ChatResponse::failure("down");
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["reply"], "down");
        assert_eq!(json["response"], "down");
        assert_eq!(json["ok"], false);
    }

    #[test]
    fn chat_request_defaults_to_empty_history() {
        let request: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert!(request.history.is_empty());
    }
}
