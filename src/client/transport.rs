use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Shown when the relay answers without a `reply` field.
pub const NO_REPLY_FALLBACK: &str = "I couldn’t get a reply from the agent.";

/// Way of delivering one user message to the relay and getting the reply.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, message: &str) -> Result<String, ClientError>;
}

/// Posts `{ "message": … }` to the relay endpoint.
#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    client: Client,
    relay_url: String,
}

impl HttpRelayClient {
    pub fn new(relay_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            relay_url: relay_url.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.relay_url.clone())
    }
}

#[async_trait]
impl RelayTransport for HttpRelayClient {
    async fn send(&self, message: &str) -> Result<String, ClientError> {
        let response = self
            .client
            .post(&self.relay_url)
            .json(&json!({ "message": message }))
            .send()
            .await?;
        debug!("Relay answered {}", response.status());

        // Error statuses still carry a JSON body; only its `reply` matters.
        let data: Value = response.json().await?;
        Ok(reply_or_fallback(&data))
    }
}

fn reply_or_fallback(data: &Value) -> String {
    data.get("reply")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_REPLY_FALLBACK)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_reply_field() {
        assert_eq!(reply_or_fallback(&json!({ "reply": "hi" })), "hi");
    }

    #[test]
    fn error_body_maps_to_fallback() {
        assert_eq!(
            reply_or_fallback(&json!({ "error": "Agent request failed." })),
            NO_REPLY_FALLBACK
        );
        assert_eq!(reply_or_fallback(&json!({ "reply": "" })), NO_REPLY_FALLBACK);
    }
}
