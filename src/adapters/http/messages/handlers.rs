//! HTTP handlers for the messages endpoints.
//!
//! The transport boundary: arbitrary JSON payloads become validated inbound
//! messages here, and typed broadcast errors become status codes here.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tokio_util::sync::CancellationToken;

use crate::application::BroadcastHandler;
use crate::domain::{BroadcastError, InboundMessage};

use super::dto::{BroadcastMessageRequest, BroadcastMessageResponse, ErrorResponse};

/// Shared application state for the messages routes.
#[derive(Clone)]
pub struct MessagesAppState {
    pub broadcast_handler: Arc<BroadcastHandler>,
    /// Cancelled when the process begins graceful shutdown; each request
    /// derives a child token from it so in-flight broadcasts observe the
    /// shutdown at their next checkpoint and roll back.
    pub shutdown: CancellationToken,
}

/// `POST /messages` - broadcast one message to all configured environments.
pub async fn broadcast_message(
    State(state): State<MessagesAppState>,
    Json(request): Json<BroadcastMessageRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let message = InboundMessage::create(&request.payload.to_string())
        .map_err(|e| error_response(&BroadcastError::from(e)))?;

    let cancel = state.shutdown.child_token();
    state
        .broadcast_handler
        .handle(&message, &cancel)
        .await
        .map_err(|e| error_response(&e))?;

    Ok((
        StatusCode::OK,
        Json(BroadcastMessageResponse {
            id: *message.id().as_uuid(),
        }),
    ))
}

/// `GET /hc` - process liveness probe.
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Maps a broadcast error onto a status code and error body.
///
/// Validation problems are the client's to fix; everything else surfaces as
/// a generic server failure so store details never leak to callers.
fn error_response(error: &BroadcastError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match error {
        BroadcastError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
        BroadcastError::Configuration(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
        }
        BroadcastError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_FAILURE"),
        BroadcastError::Cancelled => (StatusCode::INTERNAL_SERVER_ERROR, "BROADCAST_CANCELLED"),
    };

    if status.is_server_error() {
        tracing::error!(%error, "broadcast request failed");
    } else {
        tracing::debug!(%error, "broadcast request rejected");
    }

    (status, Json(ErrorResponse::new(code, error.to_string())))
}
