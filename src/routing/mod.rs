//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     (verb, path, handler)
//!     → path.rs (validate & normalize path)
//!     → router.rs (store under the table's key policy)
//!
//! Per request:
//!     (verb, path) → router.rs lookup → Handler or no match
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, read-only while serving
//! - Exact path matching, case-sensitive
//! - Explicit no-match so the transport can apply its own 404

pub mod path;
pub mod router;

pub use path::RoutePath;
pub use router::{Handler, KeyPolicy, RouteHandle, RouteTable};

/// Registration-time errors. Fatal for that single binding only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("invalid route path: {0:?}")]
    InvalidPath(String),
    #[error("route verb must not be the no-verb sentinel")]
    InvalidVerb,
}
