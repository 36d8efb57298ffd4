//! PostgreSQL implementation of the unit of work.
//!
//! One sqlx transaction backs each unit of work. The transaction lives in a
//! shared handle so every writer can execute against it; `commit` takes it
//! out of the handle, and an uncommitted transaction rolls back when the
//! last handle is dropped (sqlx drop semantics). That gives the release
//! contract: exactly one commit or rollback on every exit path.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::domain::{BroadcastError, EnvironmentId};
use crate::ports::{OutboxWriter, UnitOfWork, UnitOfWorkFactory};

use super::outbox_writer::PgOutboxWriter;

/// Transaction handle shared between a unit of work and its writers.
///
/// The mutex serializes access because a single Postgres transaction
/// connection must not be used concurrently; `None` means the transaction
/// has been committed or released.
pub type SharedTransaction = Arc<Mutex<Option<Transaction<'static, Postgres>>>>;

/// Keeps one environment per distinct normalized name, preserving the
/// position of the first occurrence.
///
/// Collision policy is defined last-wins: a later duplicate replaces the
/// earlier entry. With identical normalized names the replacement is
/// observationally equal, but the policy is deliberate, not accidental.
fn distinct_environments(environments: &[EnvironmentId]) -> Vec<EnvironmentId> {
    let mut distinct: Vec<EnvironmentId> = Vec::with_capacity(environments.len());
    for env in environments {
        match distinct.iter().position(|existing| existing == env) {
            Some(i) => distinct[i] = env.clone(),
            None => distinct.push(env.clone()),
        }
    }
    distinct
}

/// Unit of work over one transaction and one writer per environment.
pub struct PgUnitOfWork {
    transaction: SharedTransaction,
    writers: Vec<Arc<dyn OutboxWriter>>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    fn writers(&self) -> &[Arc<dyn OutboxWriter>] {
        &self.writers
    }

    async fn commit(&self, cancel: &CancellationToken) -> Result<(), BroadcastError> {
        if cancel.is_cancelled() {
            return Err(BroadcastError::Cancelled);
        }

        tracing::info!("committing broadcast transaction");

        let txn = self
            .transaction
            .lock()
            .await
            .take()
            .ok_or_else(|| BroadcastError::storage("transaction is no longer active"))?;

        txn.commit()
            .await
            .map_err(|e| BroadcastError::storage(format!("failed to commit transaction: {}", e)))
    }
}

/// Opens units of work against a connection pool for a fixed environment set.
#[derive(Debug)]
pub struct PgUnitOfWorkFactory {
    pool: PgPool,
    environments: Vec<EnvironmentId>,
}

impl PgUnitOfWorkFactory {
    /// Creates a factory for the configured environments.
    ///
    /// Fails fast with [`BroadcastError::Configuration`] if the list is
    /// empty. Duplicates after normalization collapse to one writer.
    pub fn new(pool: PgPool, environments: Vec<EnvironmentId>) -> Result<Self, BroadcastError> {
        if environments.is_empty() {
            return Err(BroadcastError::configuration(
                "at least one outbox environment must be configured",
            ));
        }
        Ok(Self {
            pool,
            environments: distinct_environments(&environments),
        })
    }
}

#[async_trait]
impl UnitOfWorkFactory for PgUnitOfWorkFactory {
    async fn begin(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Box<dyn UnitOfWork>, BroadcastError> {
        if cancel.is_cancelled() {
            return Err(BroadcastError::Cancelled);
        }

        let mut txn = self
            .pool
            .begin()
            .await
            .map_err(|e| BroadcastError::storage(format!("failed to begin transaction: {}", e)))?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL READ COMMITTED")
            .execute(&mut *txn)
            .await
            .map_err(|e| {
                BroadcastError::storage(format!("failed to set isolation level: {}", e))
            })?;

        let transaction: SharedTransaction = Arc::new(Mutex::new(Some(txn)));

        let writers: Vec<Arc<dyn OutboxWriter>> = self
            .environments
            .iter()
            .map(|env| {
                Arc::new(PgOutboxWriter::new(env.clone(), transaction.clone()))
                    as Arc<dyn OutboxWriter>
            })
            .collect();

        tracing::info!(
            environments = self.environments.len(),
            "transaction started for message broadcasting"
        );

        Ok(Box::new(PgUnitOfWork {
            transaction,
            writers,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(name: &str) -> EnvironmentId {
        EnvironmentId::new(name).unwrap()
    }

    fn envs(names: &[&str]) -> Vec<EnvironmentId> {
        names.iter().map(|n| env(n)).collect()
    }

    #[test]
    fn distinct_environments_preserves_configuration_order() {
        let distinct = distinct_environments(&envs(&["dev", "stage", "prod"]));
        assert_eq!(distinct, envs(&["DEV", "STAGE", "PROD"]));
    }

    #[test]
    fn distinct_environments_collapses_normalized_duplicates() {
        let distinct = distinct_environments(&envs(&["dev", " DEV ", "stage", "Dev"]));
        assert_eq!(distinct, envs(&["DEV", "STAGE"]));
    }

    #[test]
    fn distinct_environments_keeps_first_occurrence_position() {
        let distinct = distinct_environments(&envs(&["stage", "dev", "stage"]));
        assert_eq!(distinct, envs(&["STAGE", "DEV"]));
    }

    #[tokio::test]
    async fn commit_after_release_fails_with_storage_error() {
        let uow = PgUnitOfWork {
            transaction: Arc::new(Mutex::new(None)),
            writers: Vec::new(),
        };

        let err = uow.commit(&CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, BroadcastError::Storage(_)));
    }

    #[tokio::test]
    async fn commit_observes_cancellation_before_touching_the_transaction() {
        let uow = PgUnitOfWork {
            transaction: Arc::new(Mutex::new(None)),
            writers: Vec::new(),
        };
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = uow.commit(&cancel).await.unwrap_err();
        assert!(matches!(err, BroadcastError::Cancelled));
    }

    #[tokio::test]
    async fn factory_rejects_empty_environment_list() {
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let err = PgUnitOfWorkFactory::new(pool, Vec::new()).unwrap_err();
        assert!(matches!(err, BroadcastError::Configuration(_)));
    }

    #[tokio::test]
    async fn factory_builds_one_entry_per_distinct_environment() {
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let factory = PgUnitOfWorkFactory::new(pool, envs(&["dev", "DEV", "stage"])).unwrap();
        assert_eq!(factory.environments, envs(&["DEV", "STAGE"]));
    }
}
