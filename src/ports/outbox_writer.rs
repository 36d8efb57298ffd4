//! OutboxWriter port - per-environment transactional message persistence.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{BroadcastError, EnvironmentId, InboundMessage};

/// Port for writing one message into a single environment's outbox table.
///
/// A writer is bound to exactly one environment for its whole lifetime and
/// participates in a transaction owned by the surrounding unit of work; it
/// never commits on its own. Implementations must:
/// - observe the cancellation token before issuing I/O
/// - use parameter binding for all message values
/// - propagate store failures as [`BroadcastError::Storage`] without any
///   partial recovery
#[async_trait]
pub trait OutboxWriter: Send + Sync {
    /// The environment this writer is bound to.
    fn environment(&self) -> &EnvironmentId;

    /// Writes the message into this environment's outbox table as part of
    /// the shared transaction. On success exactly one pending, uncommitted
    /// row exists for the message id.
    async fn write(
        &self,
        message: &InboundMessage,
        cancel: &CancellationToken,
    ) -> Result<(), BroadcastError>;
}
