//! Dispatch adapter between the transport and domain handlers.
//!
//! # Per-request state machine
//! ```text
//! Received → Unrouted                      (callback never fires)
//! Received → Routed → Invoked → Completed  (callback fires once, handler response)
//! Received → Routed → Invoked → Failed     (callback fires once, error envelope)
//! ```
//!
//! A handler that yields nothing, or panics, still completes the request
//! exactly once. Completing and then reporting "unhandled" is never possible.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::dispatch::completion::Completion;
use crate::http::envelope::Envelope;
use crate::http::request::Request;
use crate::http::response::ApiResponse;
use crate::observability::metrics;
use crate::routing::path;
use crate::routing::RouteTable;

pub const HANDLER_NO_RESPONSE: &str = "Request handler produced no response";
pub const HANDLER_PANICKED: &str = "Request handler failed";

/// Terminal state of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No route matched; the transport should apply its own fallback.
    Unrouted,
    /// The handler produced a response and it was delivered.
    Completed,
    /// The handler produced nothing or panicked; an error envelope was delivered.
    Failed,
}

impl DispatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Unrouted => "unrouted",
            DispatchOutcome::Completed => "completed",
            DispatchOutcome::Failed => "failed",
        }
    }

    /// Whether the completion callback was invoked.
    pub fn is_handled(&self) -> bool {
        !matches!(self, DispatchOutcome::Unrouted)
    }
}

/// Looks up routes and invokes handlers with exactly-once completion.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    routes: Arc<RouteTable>,
}

impl Dispatcher {
    pub fn new(routes: Arc<RouteTable>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Dispatch one request synchronously.
    pub fn dispatch(&self, request: Request, on_complete: Completion) -> DispatchOutcome {
        let start = Instant::now();
        let verb = request.verb();

        let Some(handler) = self.routes.lookup(verb, request.path()) else {
            tracing::debug!(verb = %verb, path = %request.path(), "No route matched");
            metrics::record_dispatch(verb, "unmatched", DispatchOutcome::Unrouted, start);
            return DispatchOutcome::Unrouted;
        };
        let route = path::normalize(request.path()).to_string();

        let (response, outcome) = match panic::catch_unwind(AssertUnwindSafe(|| handler(&request))) {
            Ok(Some(response)) => (response, DispatchOutcome::Completed),
            Ok(None) => {
                tracing::warn!(verb = %verb, path = %route, "Handler produced no response");
                (ApiResponse::from(Envelope::error(HANDLER_NO_RESPONSE)), DispatchOutcome::Failed)
            }
            Err(payload) => {
                tracing::error!(
                    verb = %verb,
                    path = %route,
                    panic = %panic_message(payload.as_ref()),
                    "Handler panicked"
                );
                (ApiResponse::from(Envelope::error(HANDLER_PANICKED)), DispatchOutcome::Failed)
            }
        };

        on_complete.complete(response);

        tracing::debug!(
            verb = %verb,
            path = %route,
            outcome = outcome.as_str(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Request dispatched"
        );
        metrics::record_dispatch(verb, &route, outcome, start);
        outcome
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::method::Verb;
    use crate::routing::KeyPolicy;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Completion that counts invocations and keeps the last response.
    fn counting() -> (Completion, Arc<AtomicUsize>, Arc<Mutex<Option<ApiResponse>>>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(Mutex::new(None));
        let (c, l) = (calls.clone(), last.clone());
        let completion = Completion::new(move |response| {
            c.fetch_add(1, Ordering::SeqCst);
            *l.lock().unwrap() = Some(response);
        });
        (completion, calls, last)
    }

    fn dispatcher() -> Dispatcher {
        let mut table = RouteTable::new(KeyPolicy::Compound);
        table
            .register(Verb::Get, "/ok", |_| Some(Envelope::success_message("fine").into()))
            .unwrap();
        table.register(Verb::Get, "/nothing", |_| None).unwrap();
        table
            .register(Verb::Get, "/panic", |_| panic!("handler exploded"))
            .unwrap();
        table
            .register(Verb::Get, "/domain-error", |_| Some(Envelope::error("no pawn").into()))
            .unwrap();
        Dispatcher::new(Arc::new(table))
    }

    fn run(path: &str) -> (DispatchOutcome, usize, Option<Envelope>) {
        let (completion, calls, last) = counting();
        let outcome = dispatcher().dispatch(Request::builder(Verb::Get, path).build(), completion);
        let envelope = last.lock().unwrap().as_ref().map(|r| r.envelope().unwrap());
        (outcome, calls.load(Ordering::SeqCst), envelope)
    }

    #[test]
    fn test_unrouted_never_completes() {
        let (outcome, calls, envelope) = run("/missing");
        assert_eq!(outcome, DispatchOutcome::Unrouted);
        assert!(!outcome.is_handled());
        assert_eq!(calls, 0);
        assert!(envelope.is_none());
    }

    #[test]
    fn test_wrong_verb_is_unrouted() {
        let (completion, calls, _) = counting();
        let outcome = dispatcher().dispatch(Request::builder(Verb::Put, "/ok").build(), completion);
        assert_eq!(outcome, DispatchOutcome::Unrouted);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_completed_fires_once_with_handler_response() {
        let (outcome, calls, envelope) = run("/ok");
        assert_eq!(outcome, DispatchOutcome::Completed);
        assert_eq!(calls, 1);
        let envelope = envelope.unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.message, "fine");
    }

    #[test]
    fn test_domain_error_envelope_counts_as_completed() {
        let (outcome, calls, envelope) = run("/domain-error");
        assert_eq!(outcome, DispatchOutcome::Completed);
        assert_eq!(calls, 1);
        assert!(!envelope.unwrap().success);
    }

    #[test]
    fn test_empty_handler_result_fires_once_with_error() {
        let (outcome, calls, envelope) = run("/nothing");
        assert_eq!(outcome, DispatchOutcome::Failed);
        assert_eq!(calls, 1);
        let envelope = envelope.unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.code, -1);
        assert_eq!(envelope.message, HANDLER_NO_RESPONSE);
    }

    #[test]
    fn test_panicking_handler_fires_once_with_error() {
        let (outcome, calls, envelope) = run("/panic");
        assert_eq!(outcome, DispatchOutcome::Failed);
        assert_eq!(calls, 1);
        assert_eq!(envelope.unwrap().message, HANDLER_PANICKED);
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
