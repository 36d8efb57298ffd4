//! Inbound message value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{Timestamp, ValidationError};

/// Strongly-typed unique identifier for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random MessageId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a MessageId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Validated non-empty message payload.
///
/// The exact original string is preserved; only emptiness after trimming is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessagePayload(String);

impl MessagePayload {
    /// Creates a payload from a string, rejecting blank input.
    pub fn new(payload: impl Into<String>) -> Result<Self, ValidationError> {
        let payload = payload.into();
        if payload.trim().is_empty() {
            return Err(ValidationError::empty_field("payload"));
        }
        Ok(Self(payload))
    }

    /// Returns the raw payload string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An inbound message intended for broadcast to all configured environments.
///
/// Immutable after construction: the id is generated once and the creation
/// timestamp is stamped once.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    id: MessageId,
    payload: MessagePayload,
    created_at: Timestamp,
}

impl InboundMessage {
    /// Creates a message from a raw payload string, generating a fresh id
    /// and stamping the creation time.
    pub fn create(payload: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: MessageId::new(),
            payload: MessagePayload::new(payload)?,
            created_at: Timestamp::now(),
        })
    }

    /// Returns the message id.
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Returns the message payload.
    pub fn payload(&self) -> &MessagePayload {
        &self.payload
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }
}
