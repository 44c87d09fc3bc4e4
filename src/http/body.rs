//! Request body decoding with content-type gating.
//!
//! # Rules
//! - A `Content-Type` value must equal `application/json` or `text/json`
//!   (case-insensitive)
//! - Any `charset=X` value with `X != utf-8` rejects the request outright
//! - No `Content-Type` header means not JSON
//! - Gating happens before any parsing; a rejected body is never read

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::http::request::Request;

const JSON_MEDIA_TYPES: [&str; 2] = ["application/json", "text/json"];
const CHARSET_PREFIX: &str = "charset=";
const UTF8_CHARSET: &str = "charset=utf-8";

/// Reasons a body could not be decoded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BodyError {
    #[error("request content is not utf-8 JSON")]
    InvalidContentType,
    #[error("malformed JSON body: {0}")]
    MalformedJson(String),
    #[error("JSON body does not match the expected shape: {0}")]
    Schema(String),
}

/// Whether the request declares a UTF-8 JSON body.
pub fn is_utf8_json_content(request: &Request) -> bool {
    let mut is_json = false;
    for value in request.header_values("content-type") {
        let value = value.to_ascii_lowercase();
        if value.starts_with(CHARSET_PREFIX) && value != UTF8_CHARSET {
            return false;
        }
        if JSON_MEDIA_TYPES.contains(&value.as_str()) {
            is_json = true;
        }
    }
    is_json
}

/// Parse the body as an arbitrary JSON value.
pub fn parse_json_body(request: &Request) -> Result<Value, BodyError> {
    if !is_utf8_json_content(request) {
        tracing::warn!(path = %request.path(), "Request body is not utf-8 application/json");
        return Err(BodyError::InvalidContentType);
    }

    let text = std::str::from_utf8(request.body()).map_err(|e| {
        tracing::warn!(path = %request.path(), error = %e, "Request body is not valid utf-8");
        BodyError::MalformedJson(e.to_string())
    })?;

    serde_json::from_str(text).map_err(|e| {
        tracing::warn!(
            path = %request.path(),
            error = %e,
            body_bytes = text.len(),
            "Failed to parse request body as JSON"
        );
        BodyError::MalformedJson(e.to_string())
    })
}

/// Parse the body into `T`, with the same gating as [`parse_json_body`].
pub fn parse_typed_body<T: DeserializeOwned>(request: &Request) -> Result<T, BodyError> {
    let value = parse_json_body(request)?;
    serde_json::from_value(value).map_err(|e| {
        tracing::warn!(path = %request.path(), error = %e, "JSON body has unexpected shape");
        BodyError::Schema(e.to_string())
    })
}
