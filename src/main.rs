//! Pawn gateway server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request       ┌──────────────────────────────────────────────────┐
//!     ─────────────────────┼─▶ http::server ──▶ dispatch::adapter ──▶ routing │
//!                          │   (axum, layers)    (exactly-once        (verb,   │
//!                          │                      completion)          path)   │
//!                          │                           │                      │
//!                          │                           ▼                      │
//!                          │                      handlers ──▶ domain::World  │
//!                          │                           │                      │
//!     Client Response      │                           ▼                      │
//!     ◀────────────────────┼── http::response ◀── http::envelope              │
//!                          │                                                  │
//!                          │   config · lifecycle · observability             │
//!                          └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use pawn_gateway::config::{self, GatewayConfig, Overrides};
use pawn_gateway::domain::SimWorld;
use pawn_gateway::lifecycle::{signals, WebServer};
use pawn_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "pawn-gateway")]
#[command(about = "HTTP gateway for the controlled player pawn", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port (overrides the config file).
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (overrides the config file).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => GatewayConfig::default(),
    };
    let config = config::apply_overrides(
        config,
        Overrides {
            port: cli.port,
            log_level: cli.log_level,
        },
    )?;
    let port = config.listener.port;

    logging::init_logging(&config.observability.log_level)?;
    tracing::info!("pawn-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_host = %config.listener.bind_host,
        port,
        key_policy = ?config.routing.key_policy,
        max_body_bytes = config.limits.max_body_bytes,
        handler_timeout_ms = ?config.timeouts.handler_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let (world, _pawn) = SimWorld::with_pawn();
    let server = WebServer::new(config, Arc::new(world));
    server.start(port).await?;

    signals::shutdown_signal().await?;
    server.stop().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
