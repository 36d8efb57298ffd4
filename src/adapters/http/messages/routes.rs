//! Axum router configuration for the messages endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{broadcast_message, health_check, MessagesAppState};

/// Create the messages API router.
///
/// # Routes
/// - `POST /messages` - Broadcast a message to all configured environments
pub fn messages_routes() -> Router<MessagesAppState> {
    Router::new().route("/messages", post(broadcast_message))
}

/// Create the complete application router.
///
/// Mounts the messages routes under `/api` and exposes the `/hc` liveness
/// probe at the root.
pub fn messages_router() -> Router<MessagesAppState> {
    Router::new()
        .nest("/api", messages_routes())
        .route("/hc", get(health_check))
}
