//! Domain layer - value objects and the broadcast error taxonomy.
//!
//! Nothing in this module touches infrastructure; adapters map store and
//! transport failures into these types at the boundary.

mod environment;
mod errors;
mod message;
mod timestamp;

pub use environment::EnvironmentId;
pub use errors::{BroadcastError, ValidationError};
pub use message::{InboundMessage, MessageId, MessagePayload};
pub use timestamp::Timestamp;
