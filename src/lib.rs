//! # savanna-backend
//!
//! REST backend for a safari tourism marketplace: national parks,
//! tours, lodges, bookings, and reviews.
//!
//! The rigorously guarded core is the booking flow: tour capacity is a
//! ledger charged and credited under a per-tour write lock, so
//! concurrent bookings can never oversell a departure.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── ReservationService / ReviewService / CatalogService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── EntityStore registries (domain/)
//!     │
//!     └── PostgreSQL Persistence
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
