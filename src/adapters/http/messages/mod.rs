//! HTTP adapter for the messages endpoints.
//!
//! - `POST /api/messages` - broadcast an inbound message
//! - `GET /hc` - liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::MessagesAppState;
pub use routes::messages_router;
