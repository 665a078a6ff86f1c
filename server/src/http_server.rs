use crate::app;
use crate::config::ServerConfig;
use crate::middleware::SessionLayer;
use axum::{routing::any, Router};
use session_core::{ConfigResult, SessionConfig, SessionStoreRef};
use std::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the demo router with the session layer installed
pub fn router(store: SessionStoreRef, session: SessionConfig) -> ConfigResult<Router> {
    let sessions = SessionLayer::new(store, session)?;
    Ok(Router::new()
        .route("/", any(app::visit_counter))
        .route("/*path", any(app::visit_counter))
        .layer(sessions)
        .layer(TraceLayer::new_for_http()))
}

/// Start the HTTP server on the configured address
pub async fn run_server(config: ServerConfig, store: SessionStoreRef) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.http_addr)
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", config.http_addr, e))?;
    let app = router(store, config.session)?;
    serve(listener, app).await
}

/// Serve the router on an already bound listener until Ctrl-C
pub async fn serve(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    listener.set_nonblocking(true)?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::Server::from_tcp(listener)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server failed: {}", e))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
