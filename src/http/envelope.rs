//! Uniform JSON response envelope.
//!
//! Every routed response body has the shape
//! `{"data": {..}, "message": "..", "success": bool, "code": int}`.
//! `code == 0` is reserved for success; failures default to `-1`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Code carried by every successful envelope.
pub const SUCCESS_CODE: i32 = 0;

/// Code carried by failures when the caller does not pick one.
pub const DEFAULT_ERROR_CODE: i32 = -1;

/// Emitted if serialization ever fails, so the wire still sees a valid envelope.
const FALLBACK_BODY: &[u8] =
    br#"{"data":{},"message":"Failed to serialize response","success":false,"code":-1}"#;

/// The envelope itself. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub data: Map<String, Value>,
    pub message: String,
    pub success: bool,
    pub code: i32,
}

impl Envelope {
    /// Build an envelope with every field explicit.
    pub fn new(data: Map<String, Value>, message: impl Into<String>, success: bool, code: i32) -> Self {
        Self {
            data,
            message: message.into(),
            success,
            code,
        }
    }

    /// Success with data and message.
    pub fn success(data: Map<String, Value>, message: impl Into<String>) -> Self {
        Self::new(data, message, true, SUCCESS_CODE)
    }

    /// Success carrying only data; the message is empty.
    pub fn success_data(data: Map<String, Value>) -> Self {
        Self::success(data, "")
    }

    /// Success carrying only a message; data is `{}`.
    pub fn success_message(message: impl Into<String>) -> Self {
        Self::success(Map::new(), message)
    }

    /// Failure with data, message and code. A code of `0` is coerced to
    /// [`DEFAULT_ERROR_CODE`] since it would read as success.
    pub fn error_with(data: Map<String, Value>, message: impl Into<String>, code: i32) -> Self {
        let code = if code == SUCCESS_CODE { DEFAULT_ERROR_CODE } else { code };
        Self::new(data, message, false, code)
    }

    /// Failure with data and message, default code.
    pub fn error_data(data: Map<String, Value>, message: impl Into<String>) -> Self {
        Self::error_with(data, message, DEFAULT_ERROR_CODE)
    }

    /// Failure with message and code; data is `{}`.
    pub fn error_code(message: impl Into<String>, code: i32) -> Self {
        Self::error_with(Map::new(), message, code)
    }

    /// Failure with message only.
    pub fn error(message: impl Into<String>) -> Self {
        Self::error_code(message, DEFAULT_ERROR_CODE)
    }

    /// Serialize to JSON bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match serde_json::to_vec(self) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response envelope");
                FALLBACK_BODY.to_vec()
            }
        }
    }
}

/// Serialize the four envelope fields directly.
pub fn serialize(data: Map<String, Value>, message: &str, success: bool, code: i32) -> Vec<u8> {
    Envelope::new(data, message, success, code).to_bytes()
}
