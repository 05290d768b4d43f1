//! pathmux demo server.
//!
//! Serves one of the two demo programs over HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum catch-all ──▶ Dispatcher ──▶ route middleware ──▶ handler
//!                     (request id,        (first match     (root first)
//!                      trace, timeout)     wins)
//!                           │
//!                           └── no route matched ──▶ static assets / 404
//! ```
//!
//! # Startup
//! - Configuration: TOML file (optional), then command-line overrides
//! - Logging: `RUST_LOG` wins over the configured level
//! - Ctrl+C / SIGTERM trigger a graceful shutdown

use std::path::PathBuf;

use clap::Parser;

use pathmux::config::validation::validate_config;
use pathmux::config::{load_config, ConfigError, ServerConfig, Variant};
use pathmux::lifecycle::{signals, startup, Shutdown};
use pathmux::{demo, observability};

#[derive(Parser)]
#[command(name = "pathmux")]
#[command(about = "Serve a pathmux demo program", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "PATHMUX_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override `app.variant`.
    #[arg(long, value_enum)]
    variant: Option<Variant>,

    /// Override `assets.dir`.
    #[arg(long)]
    assets: Option<String>,

    /// Override `observability.log_level`.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(variant) = self.variant {
            config.app.variant = variant;
        }
        if let Some(assets) = self.assets {
            config.assets.dir = Some(assets);
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if config.assets.dir.is_none() {
            config.assets.dir = demo::default_assets_dir(config.app.variant).map(str::to_string);
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    observability::logging::init(&config.observability);

    tracing::info!("pathmux v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        variant = ?config.app.variant,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_shutdown().await;
        shutdown.trigger();
    });

    startup::run(config, receiver).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
