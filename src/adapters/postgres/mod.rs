//! PostgreSQL adapters - sqlx implementations of the storage ports.

mod outbox_writer;
mod unit_of_work;

pub use outbox_writer::{outbox_table_name, PgOutboxWriter};
pub use unit_of_work::{PgUnitOfWork, PgUnitOfWorkFactory, SharedTransaction};
