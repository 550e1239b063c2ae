//! Catsgram server binary
//!
//! Parses the CLI, sets up logging and serves the HTTP API until interrupted.

use catsgram::config::{ServerConfig, BIND_ADDRESS_ENV_VAR};
use catsgram::{api, AppState, APP_NAME, APP_VERSION};
use clap::Parser;

// =============================================================================
// CLI
// =============================================================================

/// Catsgram - minimal in-memory social backend
#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(about = "In-memory users and posts over HTTP")]
#[command(version)]
struct Cli {
    /// HTTP API bind address (defaults to $CATSGRAM_BIND, then 127.0.0.1:8080)
    #[arg(short, long)]
    bind: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env_bind = std::env::var(BIND_ADDRESS_ENV_VAR).ok();
    let config = ServerConfig::resolve(cli.bind.as_deref(), env_bind.as_deref(), cli.verbose)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .init();

    tracing::info!("Catsgram v{}", APP_VERSION);

    let state = AppState::new();
    let app = api::router(state);

    tracing::info!("Starting HTTP server on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
