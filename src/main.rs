use anyhow::Result;
use job_recommender::{logging, start_web_server, EnvironmentConfig};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let log_file = std::env::var("ROJGAR_LOG_FILE").ok().map(PathBuf::from);
    logging::init_tracing(log_file.as_deref())?;

    let port = match std::env::var("ROCKET_PORT") {
        Ok(raw) => raw
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?,
        Err(_) => 8000,
    };

    let config = EnvironmentConfig::load()?;
    config.ensure_directories().await?;

    info!("Environment: {}", EnvironmentConfig::get_environment());
    info!("Database: {}", config.database_path.display());
    info!("Server: http://0.0.0.0:{}", port);

    start_web_server(config, port).await
}
