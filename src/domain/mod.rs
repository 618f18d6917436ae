//! Domain layer: marketplace entities, the capacity ledger, and events.
//!
//! This module contains the server-side domain model including typed
//! entity identifiers, the catalog entities (tours, parks, lodges,
//! users), bookings and reviews, the generic per-record-locked
//! registry, and the event bus that broadcasts state changes.

pub mod booking;
pub mod event;
pub mod event_bus;
pub mod ids;
pub mod lodge;
pub mod park;
pub mod rating;
pub mod registry;
pub mod review;
pub mod store;
pub mod tour;
pub mod user;

pub use booking::{Booking, BookingStatus, Currency, EmergencyContact, Participants, PaymentStatus};
pub use event::DomainEvent;
pub use event_bus::EventBus;
pub use ids::{BookingId, LodgeId, ParkId, ReviewId, TourId, UserId};
pub use lodge::{Lodge, LodgeType};
pub use park::{Coordinates, Park};
pub use rating::RatingStats;
pub use registry::Registry;
pub use review::{HelpfulVotes, Review, ReviewRating};
pub use store::EntityStore;
pub use tour::{Difficulty, StartDate, Tour};
pub use user::{User, UserRole};
