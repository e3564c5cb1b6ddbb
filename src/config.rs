use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::classifier::scene::Scene;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub agent_config: AgentConfig,
    #[serde(default)]
    pub client_config: ClientConfig,
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Identifiers of the Dialogflow CX agent the relay talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub project_id: String,
    #[serde(default = "default_location")]
    pub location: String,
    pub agent_id: String,
    #[serde(default = "default_session_id")]
    pub session_id: String,
    #[serde(default = "default_language_code")]
    pub language_code: String,
    /// Overrides the `https://{location}-dialogflow.googleapis.com` base.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_relay_url")]
    pub relay_url: String,
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_location() -> String {
    "global".to_string()
}

fn default_session_id() -> String {
    "web-session-1".to_string()
}

fn default_language_code() -> String {
    "en".to_string()
}

fn default_fallback_reply() -> String {
    "I didn’t get a response from the agent.".to_string()
}

fn default_relay_url() -> String {
    "http://localhost:8080/api/agent-chat".to_string()
}

fn default_greeting() -> String {
    concat!(
        "Hi! I’m your Holiday Ad Assistant. ",
        "Ask me about any scene, the story, or how the ad was created."
    )
    .to_string()
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }
        let content = substitute_env_vars(&fs::read_to_string(path)?)?;
        Self::parse(path, &content)
    }

    /// Parse already-substituted content, picking the format from the path extension.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        let path_lower = path.to_lowercase();
        let mut config: Config = if path_lower.ends_with(".json") {
            serde_json::from_str(content)?
        } else {
            serde_yaml::from_str(content)?
        };

        // Cloud Run hands the listening port over through PORT
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.system_config.port = port;
        }

        Ok(config)
    }
}

/// Replace `${VAR_NAME}` with the value of the environment variable, leaving
/// unknown variables untouched.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let replaced = pattern.replace_all(content, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });
    Ok(replaced.into_owned())
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            project_id: "aster-sunrise".to_string(),
            location: default_location(),
            agent_id: "1d4ed991-3ead-4a0a-955e-146ca392e68d".to_string(),
            session_id: default_session_id(),
            language_code: default_language_code(),
            endpoint: None,
            fallback_reply: default_fallback_reply(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            relay_url: default_relay_url(),
            greeting: default_greeting(),
        }
    }
}
