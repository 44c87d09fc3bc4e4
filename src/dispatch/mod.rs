//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Transport request + Completion
//!     → adapter.rs (route lookup, handler invocation, panic capture)
//!     → completion.rs (one-shot delivery back to the transport)
//!     → DispatchOutcome (Unrouted | Completed | Failed)
//! ```
//!
//! # Design Decisions
//! - Synchronous: the handler runs to completion before the callback fires
//! - The adapter never reads or locks domain state itself

pub mod adapter;
pub mod completion;

pub use adapter::{DispatchOutcome, Dispatcher};
pub use completion::Completion;
