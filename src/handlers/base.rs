//! Service-level handlers.

use crate::http::envelope::Envelope;
use crate::http::request::Request;
use crate::http::response::ApiResponse;

pub const HEALTH_CHECK_MESSAGE: &str = "Health Check Successfully!";

/// `GET /health`
pub fn health_check(_request: &Request) -> Option<ApiResponse> {
    tracing::info!("Health check");
    Some(Envelope::success_message(HEALTH_CHECK_MESSAGE).into())
}
