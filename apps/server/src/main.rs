//! # Stockbook Server
//!
//! Runs the HTTP API on top of a SQLite database.
//!
//! ## Usage
//! ```bash
//! stockbook-server                          # defaults / platform config
//! stockbook-server --config ./stockbook.toml
//! STOCKBOOK_PORT=8080 stockbook-server
//! ```

use std::path::PathBuf;

use anyhow::Context;
use stockbook_db::Database;
use stockbook_server::{build_router, AppState, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config_path: Option<PathBuf> = None;

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockbook Server");
                println!();
                println!("Usage: stockbook-server [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Config file (default: $STOCKBOOK_CONFIG or platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = ServerConfig::load(config_path).context("loading configuration")?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Starting Stockbook server...");

    let addr = config.socket_addr()?;
    info!(
        %addr,
        database = %config.database.path.display(),
        max_connections = config.database.max_connections,
        "Configuration loaded"
    );

    let db = Database::new(config.db_config())
        .await
        .context("opening database")?;
    info!("Database ready");

    let app = build_router(AppState::new(db.clone()), config.server.cors_allow_any);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
