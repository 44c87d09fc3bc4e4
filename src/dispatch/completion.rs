//! One-shot completion sink supplied by the transport per request.

use std::fmt;

use tokio::sync::oneshot;

use crate::http::response::ApiResponse;

/// Completion callback. Consumed by [`Completion::complete`], so it can fire
/// at most once; the dispatch adapter makes it fire exactly once for every
/// routed request.
pub struct Completion {
    sink: Box<dyn FnOnce(ApiResponse) + Send>,
}

impl Completion {
    /// Wrap an arbitrary sink.
    pub fn new<F>(sink: F) -> Self
    where
        F: FnOnce(ApiResponse) + Send + 'static,
    {
        Self { sink: Box::new(sink) }
    }

    /// Completion backed by a oneshot channel, for async transports.
    pub fn channel() -> (Self, oneshot::Receiver<ApiResponse>) {
        let (tx, rx) = oneshot::channel();
        let completion = Self::new(move |response| {
            // Receiver gone means the transport already answered (timeout).
            if tx.send(response).is_err() {
                tracing::debug!("Completion receiver dropped before response was delivered");
            }
        });
        (completion, rx)
    }

    /// Deliver the response.
    pub fn complete(self, response: ApiResponse) {
        (self.sink)(response)
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::envelope::Envelope;

    #[tokio::test]
    async fn test_channel_delivers_response() {
        let (completion, rx) = Completion::channel();
        completion.complete(Envelope::success_message("done").into());

        let response = rx.await.unwrap();
        assert_eq!(response.envelope().unwrap().message, "done");
    }

    #[test]
    fn test_channel_tolerates_dropped_receiver() {
        let (completion, rx) = Completion::channel();
        drop(rx);
        completion.complete(Envelope::error("late").into());
    }
}
