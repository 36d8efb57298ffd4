//! Application handlers.

mod broadcast_message;

pub use broadcast_message::BroadcastHandler;
