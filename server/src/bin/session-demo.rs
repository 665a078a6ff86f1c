use anyhow::{Context, Result};
use clap::Parser;
use session_core::{InMemorySessionStore, SessionStoreRef};
use session_server::config::ServerConfig;
use session_server::http_server;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "session-demo", about = "Visit counter demonstrating cookie-backed sessions", version)]
struct Args {
    /// Path to config file (defaults to ~/.config/session-demo/config.toml)
    #[arg(short, long, env = "SESSION_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP server address
    #[arg(long, env = "SESSION_HTTP_ADDR")]
    http_addr: Option<SocketAddr>,

    /// Name of the cookie carrying the session identifier
    #[arg(long, env = "SESSION_COOKIE_NAME")]
    cookie_name: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SESSION_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)))
        .init();

    info!("Starting session demo");

    let config_path = match args.config {
        Some(path) => path,
        None => ServerConfig::default_path().context("Failed to determine config file path")?,
    };
    let mut config = ServerConfig::load_from_file(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    info!("Loaded configuration from {}", config_path.display());

    // Update config from CLI args
    if let Some(http_addr) = args.http_addr {
        config.http_addr = http_addr;
    }
    if let Some(cookie_name) = args.cookie_name {
        config.session.cookie_name = cookie_name;
        config.session.validate().context("Invalid --cookie-name")?;
    }

    // Lives for the whole process; sessions are never expired
    let store: SessionStoreRef = Arc::new(InMemorySessionStore::new());
    info!(cookie_name = %config.session.cookie_name, "Using in-memory session store");

    http_server::run_server(config, store).await?;

    info!("Session demo shutting down");
    Ok(())
}
