//! stockroom CLI - runs the inventory and sales HTTP API
//!
//! - `serve` starts the API over PostgreSQL (or `--in-memory`)
//! - `config` shows where settings are read from and what they contain

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "stockroom",
    author,
    version,
    about = "Inventory and sales HTTP API for products, product types and transactions"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Inspect stockroom configuration (path, show)
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so clap `env` fallbacks see .env values
    let env_files = config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();
    for path in &env_files {
        tracing::debug!("Loaded .env from {}", path.display());
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Config(args) => config::run_config(args)?,
    }
    Ok(())
}
