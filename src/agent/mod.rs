pub mod agent_client;
pub mod auth;
pub mod dialogflow_client;
pub mod reply;

pub use agent_client::AgentClient;
pub use auth::{token_provider_from_env, MetadataServerToken, StaticToken, TokenProvider};
pub use dialogflow_client::DialogflowClient;
pub use reply::extract_reply;
