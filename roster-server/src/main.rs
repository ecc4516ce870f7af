//! # Roster Server
//!
//! HTTP entry point for the Roster user directory service.
//!
//! ## Overview
//!
//! The server exposes user records over a small CRUD surface: create, read
//! by mail or as a listing, profile update, activate/deactivate, and
//! delete. Users are created deactivated and must be activated before
//! their profile can change.
//!
//! ## Architecture
//!
//! The server is built on Axum and uses:
//! - PostgreSQL for persistent storage (migrations run on boot)
//! - Layered configuration: defaults, optional TOML file, environment

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roster_core::{PostgresUserStore, UserService};
use roster_server::{
    create_app,
    infra::{
        app_state::AppState,
        config::{Config, ConfigLoader},
    },
};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "roster-server")]
#[command(about = "User directory service with lifecycle management over HTTP")]
struct Cli {
    /// Path to a TOML config file (overrides the default lookup locations)
    #[arg(long, env = "ROSTER_CONFIG")]
    config: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_server(cli).await
}

fn load_runtime_config(cli: &Cli) -> anyhow::Result<Arc<Config>> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path.clone());
    }
    let mut config = loader.load().context("failed to load configuration")?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(Arc::new(config))
}

async fn run_server(cli: Cli) -> anyhow::Result<()> {
    let config = load_runtime_config(&cli)?;

    let Some(database_url) = config.database.url.clone() else {
        error!("DATABASE_URL must be provided for PostgreSQL connections");
        anyhow::bail!("no PostgreSQL connection configuration found");
    };

    if !(database_url.starts_with("postgres://") || database_url.starts_with("postgresql://")) {
        anyhow::bail!("invalid database URL: must start with postgres:// or postgresql://");
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&database_url)
        .await
        .context("failed to connect to PostgreSQL")?;
    info!("Successfully connected to PostgreSQL");

    roster_core::MIGRATOR
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    let store = Arc::new(PostgresUserStore::new(pool));
    let service = Arc::new(UserService::new(store));
    let state = AppState::new(service, Arc::clone(&config));

    let app = create_app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Starting Roster server (HTTP) on {addr}");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
