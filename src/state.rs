use std::sync::Arc;

use crate::agent::{token_provider_from_env, AgentClient, DialogflowClient};
use crate::classifier::SceneCatalog;
use crate::config::Config;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub agent: Arc<dyn AgentClient>,
    pub catalog: Arc<SceneCatalog>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        let tokens = token_provider_from_env(client.clone());
        let agent = Arc::new(DialogflowClient::new(
            client,
            config.agent_config.clone(),
            tokens,
        ));
        Ok(Self::with_agent(config, agent))
    }

    pub fn with_agent(config: Config, agent: Arc<dyn AgentClient>) -> Self {
        let catalog = Arc::new(SceneCatalog::new(config.scenes.clone()));
        Self {
            config: Arc::new(config),
            agent,
            catalog,
        }
    }
}
