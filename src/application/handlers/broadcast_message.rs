//! BroadcastHandler - writes an inbound message to every configured
//! environment's outbox table and commits atomically.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::domain::{BroadcastError, InboundMessage};
use crate::ports::UnitOfWorkFactory;

/// Orchestrates one broadcast: open a unit of work, write the message for
/// each environment in configuration order, commit once.
///
/// Writes run sequentially because all writers share one transaction
/// connection. A failure at any environment aborts the whole broadcast
/// before commit; dropping the unit of work rolls the transaction back, so
/// the message is never visible in a strict subset of the outbox tables.
pub struct BroadcastHandler {
    unit_of_work_factory: Arc<dyn UnitOfWorkFactory>,
}

impl BroadcastHandler {
    /// Creates a handler that opens one unit of work per broadcast call.
    pub fn new(unit_of_work_factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { unit_of_work_factory }
    }

    /// Broadcasts the message to all configured environments atomically.
    ///
    /// Cancellation is observed cooperatively: before the unit of work is
    /// opened, before each write, and before commit.
    pub async fn handle(
        &self,
        message: &InboundMessage,
        cancel: &CancellationToken,
    ) -> Result<(), BroadcastError> {
        if cancel.is_cancelled() {
            return Err(BroadcastError::Cancelled);
        }

        tracing::info!(message_id = %message.id(), "begin broadcasting message");

        let uow = self.unit_of_work_factory.begin(cancel).await?;

        for writer in uow.writers() {
            tracing::info!(
                message_id = %message.id(),
                environment = %writer.environment(),
                "writing message for environment"
            );
            writer.write(message, cancel).await?;
        }

        uow.commit(cancel).await?;

        tracing::info!(message_id = %message.id(), "message broadcast committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EnvironmentId;
    use crate::ports::{OutboxWriter, UnitOfWork};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════

    #[derive(Default)]
    struct WriteLog {
        written: Mutex<Vec<String>>,
        committed: Mutex<bool>,
    }

    struct MockWriter {
        environment: EnvironmentId,
        log: Arc<WriteLog>,
        fail: bool,
        cancel_before_write: Option<CancellationToken>,
    }

    #[async_trait]
    impl OutboxWriter for MockWriter {
        fn environment(&self) -> &EnvironmentId {
            &self.environment
        }

        async fn write(
            &self,
            _message: &InboundMessage,
            cancel: &CancellationToken,
        ) -> Result<(), BroadcastError> {
            if cancel.is_cancelled() {
                return Err(BroadcastError::Cancelled);
            }
            if self.fail {
                return Err(BroadcastError::storage("table missing"));
            }
            self.log
                .written
                .lock()
                .unwrap()
                .push(self.environment.as_str().to_string());
            // Simulates a cancellation request arriving while this write's
            // I/O is in flight; the next checkpoint must observe it.
            if let Some(token) = &self.cancel_before_write {
                token.cancel();
            }
            Ok(())
        }
    }

    struct MockUnitOfWork {
        writers: Vec<Arc<dyn OutboxWriter>>,
        log: Arc<WriteLog>,
        fail_commit: bool,
    }

    #[async_trait]
    impl UnitOfWork for MockUnitOfWork {
        fn writers(&self) -> &[Arc<dyn OutboxWriter>] {
            &self.writers
        }

        async fn commit(&self, cancel: &CancellationToken) -> Result<(), BroadcastError> {
            if cancel.is_cancelled() {
                return Err(BroadcastError::Cancelled);
            }
            if self.fail_commit {
                return Err(BroadcastError::storage("commit failed"));
            }
            *self.log.committed.lock().unwrap() = true;
            Ok(())
        }
    }

    struct MockFactory {
        uow: Mutex<Option<MockUnitOfWork>>,
    }

    #[async_trait]
    impl UnitOfWorkFactory for MockFactory {
        async fn begin(
            &self,
            cancel: &CancellationToken,
        ) -> Result<Box<dyn UnitOfWork>, BroadcastError> {
            if cancel.is_cancelled() {
                return Err(BroadcastError::Cancelled);
            }
            let uow = self
                .uow
                .lock()
                .unwrap()
                .take()
                .expect("unit of work already taken");
            Ok(Box::new(uow))
        }
    }

    fn env(name: &str) -> EnvironmentId {
        EnvironmentId::new(name).unwrap()
    }

    fn handler_with(
        environments: &[(&str, bool)],
        fail_commit: bool,
        cancel_after_first: Option<CancellationToken>,
    ) -> (BroadcastHandler, Arc<WriteLog>) {
        let log = Arc::new(WriteLog::default());
        let writers: Vec<Arc<dyn OutboxWriter>> = environments
            .iter()
            .enumerate()
            .map(|(i, (name, fail))| {
                Arc::new(MockWriter {
                    environment: env(name),
                    log: log.clone(),
                    fail: *fail,
                    cancel_before_write: if i == 0 {
                        cancel_after_first.clone()
                    } else {
                        None
                    },
                }) as Arc<dyn OutboxWriter>
            })
            .collect();
        let uow = MockUnitOfWork {
            writers,
            log: log.clone(),
            fail_commit,
        };
        let factory = MockFactory {
            uow: Mutex::new(Some(uow)),
        };
        (BroadcastHandler::new(Arc::new(factory)), log)
    }

    fn message() -> InboundMessage {
        InboundMessage::create("{\"hello\":true}").unwrap()
    }

    // ════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn writes_all_environments_in_order_then_commits() {
        let (handler, log) =
            handler_with(&[("dev", false), ("stage", false), ("prod", false)], false, None);

        handler
            .handle(&message(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(*log.written.lock().unwrap(), vec!["DEV", "STAGE", "PROD"]);
        assert!(*log.committed.lock().unwrap());
    }

    #[tokio::test]
    async fn write_failure_stops_iteration_and_skips_commit() {
        let (handler, log) =
            handler_with(&[("dev", false), ("stage", true), ("prod", false)], false, None);

        let err = handler
            .handle(&message(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, BroadcastError::Storage(_)));
        // Only the environment before the failure got a pending write and
        // commit never ran, so nothing becomes visible.
        assert_eq!(*log.written.lock().unwrap(), vec!["DEV"]);
        assert!(!*log.committed.lock().unwrap());
    }

    #[tokio::test]
    async fn commit_failure_surfaces_as_storage_error() {
        let (handler, log) = handler_with(&[("dev", false)], true, None);

        let err = handler
            .handle(&message(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, BroadcastError::Storage(_)));
        assert!(!*log.committed.lock().unwrap());
    }

    #[tokio::test]
    async fn cancellation_before_start_writes_nothing() {
        let (handler, log) = handler_with(&[("dev", false)], false, None);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = handler.handle(&message(), &cancel).await.unwrap_err();

        assert!(matches!(err, BroadcastError::Cancelled));
        assert!(log.written.lock().unwrap().is_empty());
        assert!(!*log.committed.lock().unwrap());
    }

    #[tokio::test]
    async fn cancellation_after_final_write_is_observed_at_the_commit_checkpoint() {
        let cancel = CancellationToken::new();
        let (handler, log) = handler_with(&[("dev", false)], false, Some(cancel.clone()));

        let err = handler.handle(&message(), &cancel).await.unwrap_err();

        // The write went through, but commit saw the cancellation first, so
        // nothing becomes visible.
        assert!(matches!(err, BroadcastError::Cancelled));
        assert_eq!(*log.written.lock().unwrap(), vec!["DEV"]);
        assert!(!*log.committed.lock().unwrap());
    }

    #[tokio::test]
    async fn cancellation_between_writes_aborts_before_commit() {
        let cancel = CancellationToken::new();
        let (handler, log) = handler_with(
            &[("dev", false), ("stage", false)],
            false,
            Some(cancel.clone()),
        );

        let err = handler.handle(&message(), &cancel).await.unwrap_err();

        assert!(matches!(err, BroadcastError::Cancelled));
        assert_eq!(*log.written.lock().unwrap(), vec!["DEV"]);
        assert!(!*log.committed.lock().unwrap());
    }
}
