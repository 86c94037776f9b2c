//! Role-based pharmacy assistant.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use pharmai_core::{Ledger, PharmaiError};
use pharmai_llm::{chat_system_prompt, ChatRole};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::state::AppState;

/// Reply sent whenever the model cannot be reached.
pub const AGENT_OFFLINE: &str = "Agent offline. Please check your network or API quota.";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub reply: String,
    /// Search grounding is not used; kept for front-end compatibility.
    pub grounding: bool,
}

/// `POST /api/chat`
///
/// Inference failures are reported in-band with status 200.
pub async fn send(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let message = request.message.trim().to_string();
    if message.is_empty() {
        return Err(ApiError::BadRequest("Missing message".into()));
    }

    let role = request
        .role
        .as_deref()
        .map(ChatRole::parse)
        .unwrap_or_default();
    let system = system_prompt(&state.ledger, role)?;

    let inferencer = state.inferencer.clone();
    let task = tokio::task::spawn_blocking(move || inferencer.infer(&message, &system));

    let reply = match tokio::time::timeout(state.config.request_timeout(), task).await {
        Ok(Ok(Ok(text))) if !text.trim().is_empty() => text,
        Ok(Ok(Ok(_))) => {
            tracing::warn!("Chat model returned an empty reply");
            AGENT_OFFLINE.to_string()
        }
        Ok(Ok(Err(e))) => {
            tracing::warn!(error = %e, "Chat inference failed");
            AGENT_OFFLINE.to_string()
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Chat task failed");
            AGENT_OFFLINE.to_string()
        }
        Err(_) => {
            tracing::warn!("Chat inference timed out");
            AGENT_OFFLINE.to_string()
        }
    };

    Ok(Json(ChatResponse {
        reply,
        grounding: false,
    }))
}

/// Ground the persona in the current inventory and history.
fn system_prompt(ledger: &Ledger, role: ChatRole) -> Result<String, PharmaiError> {
    let inventory = serde_json::to_string(&ledger.list_inventory()?)?;
    let history = serde_json::to_string(&ledger.list_history()?)?;
    Ok(chat_system_prompt(role, &inventory, &history))
}
