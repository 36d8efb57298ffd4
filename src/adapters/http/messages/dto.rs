//! Request and response DTOs for the messages endpoint.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inbound request body: the payload is an arbitrary JSON value that gets
/// stringified before entering the domain.
#[derive(Debug, Deserialize)]
pub struct BroadcastMessageRequest {
    pub payload: serde_json::Value,
}

/// Successful broadcast response.
#[derive(Debug, Serialize)]
pub struct BroadcastMessageResponse {
    pub id: Uuid,
}

/// Standard error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
