//! Domain events reflecting marketplace state mutations.
//!
//! Every state change emits a [`DomainEvent`] through the
//! [`super::EventBus`]. Events are consumed by the optional PostgreSQL
//! event log.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::ids::{BookingId, ParkId, ReviewId, TourId, UserId};

/// Domain event emitted after every state mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Emitted when a new tour is listed.
    TourCreated {
        /// Tour identifier.
        tour_id: TourId,
        /// Park the tour visits.
        park_id: ParkId,
        /// Operating agency.
        agency_id: UserId,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a booking successfully charged tour capacity.
    BookingCreated {
        /// Booking identifier.
        booking_id: BookingId,
        /// Booked tour.
        tour_id: TourId,
        /// Booking owner.
        user_id: UserId,
        /// Spots charged against the tour.
        total_participants: u32,
        /// Departure day.
        start_date: NaiveDate,
        /// Total price in USD.
        total_price: f64,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a booking was cancelled and capacity credited.
    BookingCancelled {
        /// Booking identifier.
        booking_id: BookingId,
        /// Tour that was credited.
        tour_id: TourId,
        /// Spots returned to the tour.
        spots_released: u32,
        /// Cancellation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a review is posted.
    ReviewPosted {
        /// Review identifier.
        review_id: ReviewId,
        /// Reviewed tour.
        tour_id: TourId,
        /// Author.
        user_id: UserId,
        /// Overall score (1–5).
        overall: u8,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a review updated a tour's rating aggregate.
    RatingUpdated {
        /// Tour whose aggregate changed.
        tour_id: TourId,
        /// New mean score.
        average: f64,
        /// New score count.
        count: u64,
        /// Update timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Event type discriminator string, as stored in the event log.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::TourCreated { .. } => "tour_created",
            Self::BookingCreated { .. } => "booking_created",
            Self::BookingCancelled { .. } => "booking_cancelled",
            Self::ReviewPosted { .. } => "review_posted",
            Self::RatingUpdated { .. } => "rating_updated",
        }
    }

    /// Identifier of the primary entity the event concerns.
    #[must_use]
    pub fn entity_id(&self) -> uuid::Uuid {
        match self {
            Self::TourCreated { tour_id, .. } | Self::RatingUpdated { tour_id, .. } => {
                (*tour_id).into()
            }
            Self::BookingCreated { booking_id, .. }
            | Self::BookingCancelled { booking_id, .. } => (*booking_id).into(),
            Self::ReviewPosted { review_id, .. } => (*review_id).into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn event_type_strings_are_stable() {
        let event = DomainEvent::BookingCancelled {
            booking_id: BookingId::new(),
            tour_id: TourId::new(),
            spots_released: 2,
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "booking_cancelled");
    }

    #[test]
    fn serialization_carries_tag() {
        let event = DomainEvent::RatingUpdated {
            tour_id: TourId::new(),
            average: 4.5,
            count: 2,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        assert_eq!(
            json.get("event_type").and_then(|v| v.as_str()),
            Some("rating_updated")
        );
    }

    #[test]
    fn entity_id_points_at_primary_entity() {
        let booking_id = BookingId::new();
        let event = DomainEvent::BookingCreated {
            booking_id,
            tour_id: TourId::new(),
            user_id: UserId::new(),
            total_participants: 3,
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap_or_default(),
            total_price: 3600.0,
            timestamp: Utc::now(),
        };
        assert_eq!(event.entity_id(), (*booking_id.as_uuid()));
    }
}
