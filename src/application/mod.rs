//! Application layer - orchestration of domain operations over the ports.

pub mod handlers;

pub use handlers::BroadcastHandler;
