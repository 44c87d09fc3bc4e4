//! Response produced by route handlers.
//!
//! # Responsibilities
//! - Carry a serialized body with its content type and status
//! - Convert into an axum response at the transport edge
//!
//! # Design Decisions
//! - Routed responses are always `200 OK`; the envelope carries the outcome
//! - The transport only adds status/content-type, never rewrites the body

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::IntoResponse;

use crate::http::envelope::Envelope;

const APPLICATION_JSON: &str = "application/json";

/// A fully rendered response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: StatusCode,
    content_type: &'static str,
    body: Bytes,
}

impl ApiResponse {
    /// JSON envelope response with `200 OK`.
    pub fn json(envelope: &Envelope) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: APPLICATION_JSON,
            body: Bytes::from(envelope.to_bytes()),
        }
    }

    /// Override the transport status.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decode the body back into an envelope.
    pub fn envelope(&self) -> Result<Envelope, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

impl From<Envelope> for ApiResponse {
    fn from(envelope: Envelope) -> Self {
        ApiResponse::json(&envelope)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> axum::response::Response {
        let mut response = axum::response::Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_into_response_sets_json_headers() {
        let response = ApiResponse::from(Envelope::error("nope")).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let envelope: Envelope = serde_json::from_slice(&body).unwrap();
        assert_eq!(envelope.message, "nope");
        assert!(!envelope.success);
    }

    #[test]
    fn test_with_status() {
        let response = ApiResponse::from(Envelope::error("slow")).with_status(StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(response.envelope().unwrap().message, "slow");
    }
}
