//! HTTP server command for the stockroom API
//!
//! Resolves settings, prepares the store (Postgres by default, in-memory
//! with `--in-memory`) and runs the server until Ctrl+C / SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use stockroom_server::db::{connect, migrations};
use stockroom_server::{run_server, MemoryStore, PgStore, ServerConfig, Store};

use crate::config::{StockroomConfig, DEFAULT_MAX_CONNECTIONS};

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:3099)
    #[arg(long, short = 'b', env = "STOCKROOM_BIND")]
    pub bind: Option<SocketAddr>,

    /// Only accept cross-origin requests from localhost (default: any origin)
    #[arg(long)]
    pub cors_localhost: bool,

    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled database connections (default: 5)
    #[arg(long, env = "STOCKROOM_MAX_CONNECTIONS")]
    pub max_connections: Option<u32>,

    /// Keep data in process memory instead of PostgreSQL (lost on exit)
    #[arg(long)]
    pub in_memory: bool,
}

/// Where records are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Postgres { url: String, max_connections: u32 },
}

/// Fully resolved serve settings
#[derive(Debug, Clone)]
pub struct ServePlan {
    pub server: ServerConfig,
    pub backend: Backend,
}

impl ServeArgs {
    /// Merge flags/env with the config file and defaults.
    pub fn resolve(self, file: &StockroomConfig) -> Result<ServePlan> {
        let defaults = ServerConfig::default();
        let server = ServerConfig {
            bind_addr: self
                .bind
                .or(file.server.bind)
                .unwrap_or(defaults.bind_addr),
            cors_permissive: !self.cors_localhost
                && file.server.cors_permissive.unwrap_or(defaults.cors_permissive),
        };

        let backend = if self.in_memory {
            Backend::Memory
        } else {
            let url = self
                .database_url
                .or_else(|| file.database.url.clone())
                .context(
                    "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, \
                     ~/.stockroom/config.toml, or use --in-memory",
                )?;
            let max_connections = self
                .max_connections
                .or(file.database.max_connections)
                .unwrap_or(DEFAULT_MAX_CONNECTIONS);
            Backend::Postgres {
                url,
                max_connections,
            }
        };

        Ok(ServePlan { server, backend })
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let file = StockroomConfig::load()?;
    let plan = args.resolve(&file)?;

    let store: Arc<dyn Store> = match plan.backend {
        Backend::Memory => {
            tracing::warn!("Using in-memory store - data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
        Backend::Postgres {
            url,
            max_connections,
        } => {
            let pool = connect(&url, max_connections)
                .await
                .context("Failed to create database pool")?;

            migrations::run(&pool)
                .await
                .context("Failed to prepare database schema")?;

            Arc::new(PgStore::new(pool))
        }
    };

    tracing::info!("Starting stockroom server on {}", plan.server.bind_addr);

    // Run server (blocks until shutdown)
    run_server(store, plan.server)
        .await
        .context("Server error")?;

    Ok(())
}
