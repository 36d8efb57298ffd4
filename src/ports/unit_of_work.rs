//! UnitOfWork port - the transactional scope binding all per-environment
//! writes and their commit into one atomic operation.

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::domain::BroadcastError;

use super::OutboxWriter;

/// A transactional unit of work over a fixed set of outbox writers.
///
/// Exactly one transaction is associated with exactly one unit of work. The
/// writer set is derived once, at construction, from configuration and never
/// changes afterwards. The transaction is either committed exactly once via
/// [`UnitOfWork::commit`] or rolled back when the unit of work is dropped -
/// never both. Dropping after a successful commit is a no-op.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// All writers, one per distinct normalized environment, in stable
    /// configuration order.
    fn writers(&self) -> &[Arc<dyn OutboxWriter>];

    /// Commits the transaction, making every row written by every writer in
    /// this unit of work durably visible together.
    ///
    /// Fails with [`BroadcastError::Cancelled`] if the token is already
    /// triggered (commit is then never attempted) and with
    /// [`BroadcastError::Storage`] if the commit itself fails or the
    /// transaction has already been released.
    async fn commit(&self, cancel: &CancellationToken) -> Result<(), BroadcastError>;
}

/// Opens a fresh unit of work per broadcast call.
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    /// Begins a transaction and constructs the writer set for the configured
    /// environments.
    async fn begin(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Box<dyn UnitOfWork>, BroadcastError>;
}
