use anyhow::{Context, Result};
use clap::Parser;
use job_chat::cli::{apply_serve_overrides, handle_search_command, Cli, Command};
use job_chat::{start_web_server, ConfigManager};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "job_chat=info,jobchat=info,rocket=warn";

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let json_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true) // Clear file on startup
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            Some(fmt::layer().json().with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(json_layer)
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigManager::load(cli.config.as_deref())?;
    init_tracing(config.logging.file.as_deref())?;
    match ConfigManager::config_path(cli.config.as_deref()) {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("Configuration loaded from defaults and environment"),
    }

    match cli.command {
        Some(command @ Command::Search { .. }) => handle_search_command(config, command).await,
        Some(Command::Serve { address, port }) => {
            apply_serve_overrides(&mut config, address, port)?;
            start_web_server(config).await
        }
        None => start_web_server(config).await,
    }
}
