use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Reply sent back when the request carries no usable message.
pub const EMPTY_MESSAGE_REPLY: &str = "Please type a message.";

/// Error body sent back when the agent could not be reached.
pub const AGENT_FAILURE: &str = "Agent request failed.";

/// Failures of the agent relay.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("could not obtain access token: {0}")]
    Auth(String),

    #[error("agent returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            RelayError::EmptyMessage => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "reply": EMPTY_MESSAGE_REPLY })),
            )
                .into_response(),
            err => {
                error!("Error talking to agent: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": AGENT_FAILURE })),
                )
                    .into_response()
            }
        }
    }
}

/// Failures of the chat client talking to the relay.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("relay request failed: {0}")]
    Http(#[from] reqwest::Error),
}
