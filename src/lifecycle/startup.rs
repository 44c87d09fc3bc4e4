//! Listener start/stop.
//!
//! # Responsibilities
//! - Stop any running listener before starting a new one
//! - Build a fresh route table on every start
//! - Bind the listener and serve in a background task
//! - Make `stop` idempotent and safe before any `start`
//!
//! # Design Decisions
//! - Bind failure is the only fatal, user-visible startup error
//! - Dropping the server closes the shutdown channel, which stops the listener
//! - Draining is bounded by `timeouts.drain_ms`; stuck requests are abandoned

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::GatewayConfig;
use crate::dispatch::Dispatcher;
use crate::domain::World;
use crate::handlers;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::routing::RouteTable;

/// Lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {host}:{port}: {source}")]
    Bind {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

struct Running {
    addr: SocketAddr,
    shutdown: Shutdown,
    task: JoinHandle<Result<(), std::io::Error>>,
}

/// The gateway: route registration plus one listener.
pub struct WebServer {
    config: GatewayConfig,
    world: Arc<dyn World>,
    running: Mutex<Option<Running>>,
}

impl WebServer {
    pub fn new(config: GatewayConfig, world: Arc<dyn World>) -> Self {
        Self {
            config,
            world,
            running: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Stop whatever is running, register routes, then start accepting on
    /// `port` (0 picks an ephemeral port). Returns the bound address.
    pub async fn start(&self, port: u16) -> Result<SocketAddr, ServerError> {
        let mut running = self.running.lock().await;
        shutdown_running(running.take(), self.config.timeouts.drain_timeout()).await;

        tracing::info!(port, "Starting gateway");

        let mut table = RouteTable::new(self.config.routing.key_policy);
        let bound = handlers::bind_routes(&mut table, self.world.clone());
        metrics::set_routes_bound(bound);
        tracing::info!(routes = bound, policy = ?table.policy(), "Routes bound");
        let dispatcher = Arc::new(Dispatcher::new(Arc::new(table)));

        let host = self.config.listener.bind_host.clone();
        let bind_error = |source| ServerError::Bind {
            host: host.clone(),
            port,
            source,
        };
        let listener = TcpListener::bind((host.as_str(), port)).await.map_err(bind_error)?;
        let addr = listener.local_addr().map_err(bind_error)?;

        let shutdown = Shutdown::new();
        let server = HttpServer::new(dispatcher, &self.config);
        let task = tokio::spawn(server.run(listener, shutdown.subscribe()));

        *running = Some(Running { addr, shutdown, task });
        tracing::info!(address = %addr, "Gateway started");
        Ok(addr)
    }

    /// Stop the listener. A no-op when nothing is running.
    pub async fn stop(&self) {
        let mut running = self.running.lock().await;
        shutdown_running(running.take(), self.config.timeouts.drain_timeout()).await;
    }

    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Address of the running listener.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running.lock().await.as_ref().map(|r| r.addr)
    }
}

async fn shutdown_running(running: Option<Running>, drain: Duration) {
    let Some(Running { addr, shutdown, mut task }) = running else {
        tracing::debug!("Gateway not running, nothing to stop");
        return;
    };

    tracing::info!(address = %addr, "Stopping gateway");
    shutdown.trigger();
    match tokio::time::timeout(drain, &mut task).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => tracing::error!(error = %e, "Listener exited with error"),
        Ok(Err(e)) => tracing::error!(error = %e, "Listener task failed"),
        Err(_) => {
            tracing::warn!(
                address = %addr,
                drain_ms = drain.as_millis() as u64,
                "In-flight requests did not drain, aborting listener"
            );
            task.abort();
            // Wait for the abort so the port is released before returning.
            let _ = task.await;
        }
    }
}
