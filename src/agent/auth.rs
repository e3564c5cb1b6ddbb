use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::RelayError;

/// OAuth scope requested for the agent API.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";

/// Source of bearer tokens for the agent API.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, RelayError>;
}

/// Fixed token, e.g. the output of `gcloud auth print-access-token`.
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, RelayError> {
        Ok(self.token.clone())
    }
}

/// Tokens for the runtime service account, fetched from the GCE / Cloud Run
/// metadata server on every call.
pub struct MetadataServerToken {
    client: Client,
    token_url: String,
}

#[derive(Debug, Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
}

impl MetadataServerToken {
    pub fn new(client: Client, metadata_host: &str) -> Self {
        let token_url = format!(
            "http://{}/computeMetadata/v1/instance/service-accounts/default/token?scopes={}",
            metadata_host, CLOUD_PLATFORM_SCOPE
        );
        Self { client, token_url }
    }
}

#[async_trait]
impl TokenProvider for MetadataServerToken {
    async fn access_token(&self) -> Result<String, RelayError> {
        debug!("Requesting access token from {}", self.token_url);
        let response = self
            .client
            .get(&self.token_url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| RelayError::Auth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Auth(format!(
                "metadata server returned {}: {}",
                status, body
            )));
        }

        let token: MetadataTokenResponse = response
            .json()
            .await
            .map_err(|e| RelayError::Auth(e.to_string()))?;
        Ok(token.access_token)
    }
}

/// Pick the token source from the environment.
///
/// `GOOGLE_OAUTH_ACCESS_TOKEN` wins when set; otherwise the metadata server
/// is used, honouring `GCE_METADATA_HOST`.
pub fn token_provider_from_env(client: Client) -> Arc<dyn TokenProvider> {
    match std::env::var("GOOGLE_OAUTH_ACCESS_TOKEN") {
        Ok(token) if !token.trim().is_empty() => {
            info!("Using access token from GOOGLE_OAUTH_ACCESS_TOKEN");
            Arc::new(StaticToken::new(token.trim()))
        }
        _ => {
            let host = std::env::var("GCE_METADATA_HOST")
                .unwrap_or_else(|_| DEFAULT_METADATA_HOST.to_string());
            info!("Using metadata server at {} for access tokens", host);
            Arc::new(MetadataServerToken::new(client, &host))
        }
    }
}
