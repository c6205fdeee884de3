//! Configuration file and `.env` loading
//!
//! Settings resolve in this order (highest first):
//! 1. Command-line flags
//! 2. Environment variables (`DATABASE_URL`, `STOCKROOM_BIND`, ...), including
//!    values loaded from `./.env` and `~/.stockroom/.env`
//! 3. `~/.stockroom/config.toml`
//! 4. Built-in defaults

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

/// Contents of `~/.stockroom/config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StockroomConfig {
    pub server: ServerSection,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub bind: Option<SocketAddr>,
    pub cors_permissive: Option<bool>,
}

/// Pool size when no flag, env var or config key sets one
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
}

impl StockroomConfig {
    /// Load `~/.stockroom/config.toml`; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .context(format!("Failed to parse config file (invalid TOML): {}", path.display()))
    }
}

/// Get the stockroom config directory path (~/.stockroom)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".stockroom"))
}

/// Get config file path: ~/.stockroom/config.toml
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Load `.env` files from the current directory, then `~/.stockroom/.env`.
///
/// dotenvy never overwrites variables that are already set, so the
/// current directory wins over the home directory and the real
/// environment wins over both. Returns the files that were loaded.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded.push(env_file);
        }
    }

    loaded
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Print the config file as parsed (defaults when absent)
    Show,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Path => {
            let path = config_path().context("Could not determine home directory")?;
            println!("{}", path.display());
        }
        ConfigCommands::Show => {
            let config = StockroomConfig::load()?;
            let rendered =
                toml::to_string_pretty(&config).context("Failed to render config as TOML")?;
            print!("{}", rendered);
        }
    }
    Ok(())
}
