//! bookwise-web: catalog server
//!
//! Serves the book catalog over HTTP from a read-only SQLite database
//! populated by `bookwise-admin seed`.

use anyhow::{Context, Result};
use bookwise_common::config::{
    AppConfig, CliOverrides, ENV_BIND, ENV_CONFIG, ENV_DATABASE, ENV_PORT,
};
use bookwise_common::db::connect_readonly;
use bookwise_web::{build_router, AppState};
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bookwise-web")]
#[command(about = "BookWise catalog server")]
#[command(version)]
struct Args {
    /// Config file path (TOML)
    #[arg(short, long, env = ENV_CONFIG)]
    config: Option<PathBuf>,

    /// SQLite database path
    #[arg(short, long, env = ENV_DATABASE)]
    database: Option<PathBuf>,

    /// HTTP port
    #[arg(short, long, env = ENV_PORT)]
    port: Option<u16>,

    /// Bind address
    #[arg(short, long, env = ENV_BIND)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = AppConfig::resolve(&CliOverrides {
        config_path: args.config,
        database_path: args.database,
        bind_address: args.bind,
        port: args.port,
        base_url: None,
    })
    .context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting BookWise (bookwise-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    info!("Database path: {}", config.database_path.display());
    let pool = connect_readonly(&config.database_path)
        .await
        .context("Failed to open catalog database")?;
    info!("✓ Connected to database (read-only)");

    if config.ai.api_key.is_some() {
        info!("AI features enabled (model {})", config.ai.model);
    }

    let addr = format!("{}:{}", config.bind_address, config.port);
    let state = AppState::new(pool, config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("bookwise-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
