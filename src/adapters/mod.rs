//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - sqlx implementations of the storage ports
//! - `http` - axum REST surface

pub mod http;
pub mod postgres;
