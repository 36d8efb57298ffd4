//! PostgreSQL implementation of OutboxWriter.
//!
//! Each writer targets one `outbox_<ENV>` table and executes its insert on
//! the transaction shared with the owning unit of work.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{BroadcastError, EnvironmentId, InboundMessage};
use crate::ports::OutboxWriter;

use super::unit_of_work::SharedTransaction;

/// Derives the physical outbox table name for an environment.
///
/// Pure and deterministic. The environment identifier is validated at
/// construction to contain only `[A-Za-z0-9_]`, so interpolating it into SQL
/// text is safe; message values never take this path and are always bound.
pub fn outbox_table_name(environment: &EnvironmentId) -> String {
    format!("outbox_{}", environment.as_str())
}

/// Writes inbound messages into one environment's outbox table.
pub struct PgOutboxWriter {
    environment: EnvironmentId,
    table: String,
    transaction: SharedTransaction,
}

impl PgOutboxWriter {
    /// Creates a writer bound to the given environment, deriving the target
    /// table name once.
    pub fn new(environment: EnvironmentId, transaction: SharedTransaction) -> Self {
        let table = outbox_table_name(&environment);
        Self {
            environment,
            table,
            transaction,
        }
    }
}

#[async_trait]
impl OutboxWriter for PgOutboxWriter {
    fn environment(&self) -> &EnvironmentId {
        &self.environment
    }

    async fn write(
        &self,
        message: &InboundMessage,
        cancel: &CancellationToken,
    ) -> Result<(), BroadcastError> {
        if cancel.is_cancelled() {
            return Err(BroadcastError::Cancelled);
        }

        tracing::info!(
            message_id = %message.id(),
            environment = %self.environment,
            "writing message to outbox table"
        );

        let mut guard = self.transaction.lock().await;
        let txn = guard
            .as_mut()
            .ok_or_else(|| BroadcastError::storage("transaction is no longer active"))?;

        let sql = format!(
            "INSERT INTO {} (id, payload, created_at) VALUES ($1, $2, $3)",
            self.table
        );
        sqlx::query(&sql)
            .bind(message.id().as_uuid())
            .bind(message.payload().as_str())
            .bind(message.created_at().as_datetime())
            .execute(&mut **txn)
            .await
            .map_err(|e| {
                BroadcastError::storage(format!("failed to write to {}: {}", self.table, e))
            })?;

        Ok(())
    }
}
