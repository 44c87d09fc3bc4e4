//! HTTP gateway exposing the controlled player pawn.
//!
//! Binds (verb, path) routes to handlers, completes every routed request
//! exactly once, and answers with a uniform JSON envelope.

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::GatewayConfig;
pub use dispatch::{Completion, DispatchOutcome, Dispatcher};
pub use http::{ApiResponse, Envelope, HttpServer, Request, Verb};
pub use lifecycle::{Shutdown, WebServer};
pub use routing::{KeyPolicy, RouteTable};
