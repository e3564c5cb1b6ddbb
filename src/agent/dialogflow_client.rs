use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use super::agent_client::AgentClient;
use super::auth::TokenProvider;
use crate::config::AgentConfig;
use crate::error::RelayError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectIntentRequest<'a> {
    query_input: QueryInput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryInput<'a> {
    text: TextInput<'a>,
    language_code: &'a str,
}

#[derive(Debug, Serialize)]
struct TextInput<'a> {
    text: &'a str,
}

/// Dialogflow CX client issuing one `detectIntent` call per message.
pub struct DialogflowClient {
    client: Client,
    config: AgentConfig,
    tokens: Arc<dyn TokenProvider>,
}

impl DialogflowClient {
    pub fn new(client: Client, config: AgentConfig, tokens: Arc<dyn TokenProvider>) -> Self {
        info!(
            "Initialized DialogflowClient: project={}, location={}, agent={}",
            config.project_id, config.location, config.agent_id
        );
        Self {
            client,
            config,
            tokens,
        }
    }
}

pub fn detect_intent_url(config: &AgentConfig) -> String {
    let base = config
        .endpoint
        .as_deref()
        .map(|e| e.trim_end_matches('/').to_string())
        .unwrap_or_else(|| format!("https://{}-dialogflow.googleapis.com", config.location));
    format!(
        "{}/v3/projects/{}/locations/{}/agents/{}/sessions/{}:detectIntent",
        base, config.project_id, config.location, config.agent_id, config.session_id
    )
}

#[async_trait]
impl AgentClient for DialogflowClient {
    async fn detect_intent(&self, text: &str) -> Result<Value, RelayError> {
        let token = self.tokens.access_token().await?;
        let url = detect_intent_url(&self.config);
        let body = DetectIntentRequest {
            query_input: QueryInput {
                text: TextInput { text },
                language_code: &self.config.language_code,
            },
        };

        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
