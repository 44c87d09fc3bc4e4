//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Start (startup.rs):
//!     Stop previous listener → Bind routes → Bind listener → Serve
//!
//! Stop (startup.rs + shutdown.rs):
//!     Trigger shutdown → Drain in-flight requests → Listener closed
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Stop
//! ```
//!
//! # Design Decisions
//! - Stop is idempotent; calling it with nothing running is not an error
//! - Routes are rebuilt from scratch on every start

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{ServerError, WebServer};
