use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app_token::cli::Cli;
use app_token::config::{Config, FileConfig};
use app_token::github::GitHubClient;
use app_token::pipeline::issue_token;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let loaded = match FileConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let from_file = loaded.is_some();
    let file_config = loaded.unwrap_or_default();

    // Initialize logging. Stdout is reserved for the published token.
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&file_config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if from_file {
        tracing::info!("Loaded configuration from {}", cli.config.display());
    } else {
        tracing::info!("No config file found, using defaults");
    }

    match run(&cli, file_config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Error generating access token");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, file_config: FileConfig) -> Result<()> {
    let config = Config::build(file_config, cli.overrides())?;

    tracing::debug!(
        "Starting app-token v{} for app {}",
        env!("CARGO_PKG_VERSION"),
        config.app.app_id
    );

    let client = GitHubClient::new(&config.api.url, config.api.timeout())?;
    let installation_id = issue_token(&config, &client, &config.sink, Utc::now()).await?;

    tracing::info!(installation_id = %installation_id, "Done");
    Ok(())
}
