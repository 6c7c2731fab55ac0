//! Quiztactoe - real-time trivia-gated tic-tac-toe server.

use anyhow::Result;
use clap::Parser;
use quiztactoe::{Cli, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    let config = config
        .with_host(cli.host)
        .with_port(cli.port)
        .with_bank(cli.bank);

    info!("Starting quiztactoe server");
    quiztactoe::serve(config).await
}
