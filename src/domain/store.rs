//! The entity store: one registry per entity type.

use super::booking::Booking;
use super::ids::{BookingId, LodgeId, ParkId, ReviewId, TourId, UserId};
use super::lodge::Lodge;
use super::park::Park;
use super::registry::Registry;
use super::review::Review;
use super::tour::Tour;
use super::user::User;

/// Central in-memory store holding every marketplace entity.
///
/// Shared via `Arc` in the application state. Each registry provides
/// per-record locking; the tour registry's per-record write lock is the
/// serialization point for all capacity mutation.
#[derive(Debug)]
pub struct EntityStore {
    /// User accounts.
    pub users: Registry<UserId, User>,
    /// National parks.
    pub parks: Registry<ParkId, Park>,
    /// Tours with their capacity ledgers.
    pub tours: Registry<TourId, Tour>,
    /// Lodges.
    pub lodges: Registry<LodgeId, Lodge>,
    /// Bookings.
    pub bookings: Registry<BookingId, Booking>,
    /// Reviews.
    pub reviews: Registry<ReviewId, Review>,
}

impl EntityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: Registry::new("user"),
            parks: Registry::new("park"),
            tours: Registry::new("tour"),
            lodges: Registry::new("lodge"),
            bookings: Registry::new("booking"),
            reviews: Registry::new("review"),
        }
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}
