//! Persistence layer: PostgreSQL event log and entity snapshots.
//!
//! Durable storage for domain events and periodic state snapshots of
//! the in-memory registries. The concrete implementation uses
//! `sqlx::PgPool` for async PostgreSQL access.

pub mod models;
pub mod postgres;
