use async_trait::async_trait;
use serde_json::Value;

use crate::error::RelayError;

/// Conversational agent the relay forwards user text to.
///
/// Implementations return the raw detect-intent payload; picking the reply
/// out of it is left to [`extract_reply`](super::extract_reply) so a shape
/// miss degrades to the fallback text instead of an error.
#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn detect_intent(&self, text: &str) -> Result<Value, RelayError>;
}
