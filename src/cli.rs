//! Command-line interface for quiztactoe.

use clap::Parser;
use std::path::PathBuf;

/// Quiztactoe - real-time trivia-gated tic-tac-toe server
#[derive(Parser, Debug)]
#[command(name = "quiztactoe")]
#[command(about = "Trivia-gated tic-tac-toe game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to (overrides the config file)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides the config file)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to the question bank JSON file (overrides the config file)
    #[arg(long)]
    pub bank: Option<PathBuf>,
}
