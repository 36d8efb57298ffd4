//! Ports - interfaces between the broadcast core and the storage adapter.

mod outbox_writer;
mod unit_of_work;

pub use outbox_writer::OutboxWriter;
pub use unit_of_work::{UnitOfWork, UnitOfWorkFactory};
