//! Service layer: orchestration between the REST handlers and the
//! domain store.
//!
//! Three stateless coordinators share the [`crate::domain::EntityStore`]
//! and the [`crate::domain::EventBus`]: the reservation service owns the
//! booking lifecycle and is the only writer of tour capacity, the review
//! service owns reviews and rating aggregates, and the catalog service
//! owns CRUD for the reference data.

pub mod catalog;
pub mod reservation;
pub mod review;

pub use catalog::{
    CatalogService, NewLodge, NewPark, NewTour, NewUser, ParkUpdate, ProfileUpdate, TourFilter,
    TourUpdate,
};
pub use reservation::{BookingRequest, ReservationService};
pub use review::{ReviewRequest, ReviewService};
