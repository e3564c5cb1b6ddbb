use anyhow::Result;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use ad_agent_backend::config::Config;
use ad_agent_backend::routes;
use ad_agent_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ad_agent_backend=debug,tower_http=debug")),
        )
        .init();

    let (config, loaded_path) = load_config()?;
    info!("Loaded configuration from: {}", loaded_path);
    info!("Scene catalog has {} entries", config.scenes.len());

    let addr: SocketAddr = format!("{}:{}", config.system_config.host, config.system_config.port)
        .parse()?;
    let app = routes::app(AppState::new(config)?);

    info!("Backend listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Try `CONFIG_PATH`, then the working directory, then next to the executable.
fn load_config() -> Result<(Config, String)> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.json".to_string()),
        exe_dir.join("conf.yaml").to_str().map(|s| s.to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    for path in &config_paths {
        match Config::load(path) {
            Ok(config) => return Ok((config, path.clone())),
            Err(e) => debug!("Failed to load config from {}: {}", path, e),
        }
    }

    Err(anyhow::anyhow!(
        "Could not find config file. Tried: {:?}",
        config_paths
    ))
}
