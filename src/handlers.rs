use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::agent::extract_reply;
use crate::error::RelayError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// `POST /api/agent-chat`: forward one user message to the agent.
pub async fn agent_chat(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatReply>, RelayError> {
    let message = match payload {
        Ok(Json(body)) => message_text(&body),
        Err(rejection) => {
            warn!("Rejected chat body: {}", rejection);
            String::new()
        }
    };

    if message.is_empty() {
        return Err(RelayError::EmptyMessage);
    }

    debug!("Forwarding message to agent ({} chars)", message.len());
    let response = state.agent.detect_intent(&message).await?;
    let reply = extract_reply(&response, &state.config.agent_config.fallback_reply);
    info!("Agent replied ({} chars)", reply.len());

    Ok(Json(ChatReply { reply }))
}

/// Trimmed `message` field, or empty when it is absent or not a string.
fn message_text(body: &Value) -> String {
    body.get("message")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_is_trimmed() {
        assert_eq!(message_text(&json!({ "message": "  hi there \n" })), "hi there");
    }

    #[test]
    fn non_string_message_counts_as_empty() {
        assert_eq!(message_text(&json!({ "message": 42 })), "");
        assert_eq!(message_text(&json!({})), "");
        assert_eq!(message_text(&json!("message")), "");
    }
}
