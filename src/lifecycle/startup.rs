//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize metrics when enabled
//! - Build the selected demo router and freeze it
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: a bad route or bind failure is fatal
//! - Metrics failure is not fatal; the server runs without them
//! - Listener binds last (traffic only when routes are frozen)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::ServerConfig;
use crate::demo;
use crate::http::HttpServer;
use crate::observability::metrics;
use crate::routing::RouteError;

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Route setup failed: {0}")]
    Route(#[from] RouteError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bring the server up and run it until `shutdown` fires.
pub async fn run(
    config: ServerConfig,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    serve(config, listener, shutdown).await
}

/// Same as [`run`] on an already bound listener.
pub async fn serve(
    config: ServerConfig,
    listener: TcpListener,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::warn!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(e) => tracing::warn!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let variant = config.app.variant;
    let dispatcher = demo::build(variant)?.into_dispatcher()?;
    tracing::info!(
        variant = ?variant,
        routes = dispatcher.routes().len(),
        "Routes frozen"
    );

    let server = HttpServer::new(config, dispatcher);
    server.run(listener, shutdown).await?;
    Ok(())
}
