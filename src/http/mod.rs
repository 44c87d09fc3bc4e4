//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, middleware, blocking dispatch)
//!     → request.rs (verb, path, header multimap, buffered body)
//!     → [dispatch adapter looks up and invokes the handler]
//!     → body.rs (content-type gating, JSON decoding) inside handlers
//!     → envelope.rs (uniform {data, message, success, code})
//!     → response.rs (status + content type)
//!     → Send to client
//! ```

pub mod body;
pub mod envelope;
pub mod method;
pub mod request;
pub mod response;
pub mod server;

pub use body::{parse_json_body, parse_typed_body, BodyError};
pub use envelope::Envelope;
pub use method::Verb;
pub use request::{ReadError, Request};
pub use response::ApiResponse;
pub use server::HttpServer;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";
