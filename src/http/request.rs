//! Request model handed to route handlers.
//!
//! # Responsibilities
//! - Capture verb, path, headers and body of one inbound request
//! - Split header values into an ordered multimap
//! - Buffer the body up to the configured limit
//!
//! # Design Decisions
//! - Immutable once built; handlers only ever see `&Request`
//! - Header names are lowercased, lookups are case-insensitive
//! - Header values are split on `;` so media type and parameters are
//!   separate entries (`application/json; charset=utf-8` → two values)

use std::error::Error as StdError;

use axum::body::{Body, Bytes};
use http_body_util::LengthLimitError;

use crate::http::method::Verb;

/// Failure to buffer an inbound body.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),
}

/// Whether a length limit anywhere in the body stack tripped.
fn exceeds_length_limit(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}

/// One inbound request, owned by the dispatch adapter for a single invocation.
#[derive(Debug, Clone)]
pub struct Request {
    verb: Verb,
    path: String,
    headers: Vec<(String, Vec<String>)>,
    body: Bytes,
}

impl Request {
    /// Start building a request for the given verb and path.
    pub fn builder(verb: Verb, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder {
            request: Request {
                verb,
                path: path.into(),
                headers: Vec::new(),
                body: Bytes::new(),
            },
        }
    }

    /// Convert a transport request, buffering at most `body_limit` bytes.
    pub async fn from_http(
        request: axum::http::Request<Body>,
        body_limit: usize,
    ) -> Result<Self, ReadError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, body_limit).await.map_err(|e| {
            if exceeds_length_limit(&e) {
                ReadError::TooLarge { limit: body_limit }
            } else {
                ReadError::Body(e)
            }
        })?;

        let mut builder = Request::builder(Verb::from_method(&parts.method), parts.uri.path());
        for (name, value) in parts.headers.iter() {
            // Values that are not visible ASCII carry no routing or content-type meaning.
            if let Ok(value) = value.to_str() {
                builder = builder.header(name.as_str(), value);
            }
        }
        Ok(builder.body(body).build())
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// All headers in arrival order.
    pub fn headers(&self) -> &[(String, Vec<String>)] {
        &self.headers
    }

    /// Values of every header named `name` (case-insensitive), in arrival order.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .flat_map(|(_, values)| values.iter().map(String::as_str))
    }
}

/// Builder for [`Request`], used by the transport and by tests.
#[derive(Debug)]
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    /// Append a header. Repeated names accumulate values under one entry.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        let values = value
            .split(';')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        match self.request.headers.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => existing.extend(values),
            None => self.request.headers.push((name, values.collect())),
        }
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.request.body = body.into();
        self
    }

    pub fn build(self) -> Request {
        self.request
    }
}
