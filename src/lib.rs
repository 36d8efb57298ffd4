//! Outbox Broadcast - transactional fan-out of inbound messages.
//!
//! Accepts an inbound message and durably replicates it into one
//! `outbox_<ENV>` table per configured environment inside a single
//! PostgreSQL transaction: either every environment receives the message or
//! none does.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
