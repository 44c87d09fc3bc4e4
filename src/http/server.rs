//! HTTP transport built on axum.
//!
//! # Responsibilities
//! - Own the axum Router and its middleware (tracing, request ID, body limit)
//! - Adapt each inbound request into a core [`Request`]
//! - Run the dispatch adapter on the blocking pool with a one-shot completion
//! - Fall through to a plain 404 when no route matched
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::dispatch::{Completion, DispatchOutcome, Dispatcher};
use crate::http::envelope::Envelope;
use crate::http::request::{ReadError, Request};
use crate::http::response::ApiResponse;
use crate::http::X_REQUEST_ID;

pub const NOT_FOUND_BODY: &str = "No matching route found";
pub const HANDLER_TIMED_OUT: &str = "Request handler timed out";
pub const BODY_READ_FAILED: &str = "Failed to read request body";
pub const DISPATCH_ABORTED: &str = "Request dispatch aborted";

/// Application state injected into the fallback handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub max_body_bytes: usize,
    pub handler_timeout: Option<Duration>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server that dispatches through `dispatcher`.
    pub fn new(dispatcher: Arc<Dispatcher>, config: &GatewayConfig) -> Self {
        let state = AppState {
            dispatcher,
            max_body_bytes: config.limits.max_body_bytes,
            handler_timeout: config.timeouts.handler_timeout(),
        };
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let max_body_bytes = state.max_body_bytes;
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID)))
                    .layer(RequestBodyLimitLayer::new(max_body_bytes)),
            )
    }

    /// The router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!(address = %addr, "HTTP server stopped");
        Ok(())
    }
}

/// Every request lands here and goes through the dispatch adapter.
async fn dispatch_handler(State(state): State<AppState>, request: axum::http::Request<Body>) -> Response {
    let request = match Request::from_http(request, state.max_body_bytes).await {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read request body");
            let status = match e {
                ReadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                ReadError::Body(_) => StatusCode::BAD_REQUEST,
            };
            return ApiResponse::from(Envelope::error(BODY_READ_FAILED))
                .with_status(status)
                .into_response();
        }
    };

    let (completion, response_rx) = Completion::channel();
    let dispatcher = state.dispatcher.clone();
    let task = tokio::task::spawn_blocking(move || dispatcher.dispatch(request, completion));

    let joined = match state.handler_timeout {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined,
            Err(_) => {
                tracing::warn!(timeout_ms = limit.as_millis() as u64, "Request handler timed out");
                return ApiResponse::from(Envelope::error(HANDLER_TIMED_OUT)).into_response();
            }
        },
        None => task.await,
    };

    match joined {
        Ok(DispatchOutcome::Unrouted) => (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response(),
        Ok(_) => match response_rx.await {
            Ok(response) => response.into_response(),
            Err(_) => {
                tracing::error!("Dispatch finished without delivering a response");
                ApiResponse::from(Envelope::error(DISPATCH_ABORTED)).into_response()
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "Dispatch task failed");
            ApiResponse::from(Envelope::error(DISPATCH_ABORTED)).into_response()
        }
    }
}
