//! Reservation service: the only component allowed to mutate tour
//! capacity or create and cancel bookings.
//!
//! Every check-then-mutate sequence against a tour runs under that
//! tour's write lock, so two concurrent bookings against the same tour
//! can never oversell. Different tours proceed in parallel.

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};

use crate::domain::{
    Booking, BookingId, BookingStatus, Currency, DomainEvent, EmergencyContact, EntityStore,
    EventBus, Participants, PaymentStatus, TourId, UserId,
};
use crate::error::ApiError;

/// Maximum length of free-form request and reason strings.
const MAX_NOTE_LEN: usize = 500;

/// Input for [`ReservationService::create_booking`].
#[derive(Debug, Clone)]
pub struct BookingRequest {
    /// Tour to book.
    pub tour: TourId,
    /// Participant counts per category.
    pub participants: Participants,
    /// Requested departure day.
    pub start_date: NaiveDate,
    /// Settlement currency.
    pub currency: Currency,
    /// Emergency contact, required.
    pub emergency_contact: EmergencyContact,
    /// Free-form requests, at most 500 characters.
    pub special_requests: Option<String>,
}

/// Orchestration layer for the booking lifecycle.
///
/// Stateless coordinator: owns references to the [`EntityStore`] for
/// state and the [`EventBus`] for event emission. Every mutation method
/// follows the pattern: validate → acquire lock → mutate → emit events
/// → return result.
#[derive(Debug, Clone)]
pub struct ReservationService {
    store: Arc<EntityStore>,
    event_bus: EventBus,
}

impl ReservationService {
    /// Creates a new `ReservationService`.
    #[must_use]
    pub fn new(store: Arc<EntityStore>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Creates a booking, charging the tour's capacity ledger.
    ///
    /// The capacity check, the capacity charge, and the booking insert
    /// all happen while holding the tour's write lock, so the two
    /// records commit as one logical unit. A failed insert rolls the
    /// charge back before the lock is released; precondition failures
    /// mutate nothing.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidInput`] for out-of-bounds participants or
    ///   an overlong `special_requests`.
    /// - [`ApiError::NotFound`] if the user or tour does not exist.
    /// - [`ApiError::Forbidden`] if the user account is inactive.
    /// - [`ApiError::Unavailable`] if the tour is inactive or withdrawn.
    /// - [`ApiError::DateUnavailable`] / [`ApiError::CapacityExceeded`]
    ///   per the capacity ledger rules.
    pub async fn create_booking(
        &self,
        user_id: UserId,
        req: BookingRequest,
    ) -> Result<Booking, ApiError> {
        req.participants.validate()?;
        req.emergency_contact.validate()?;
        if let Some(notes) = &req.special_requests
            && notes.len() > MAX_NOTE_LEN
        {
            return Err(ApiError::InvalidInput(
                "special requests cannot exceed 500 characters".to_string(),
            ));
        }

        let user_lock = self.store.users.get(user_id).await?;
        {
            let user = user_lock.read().await;
            if !user.is_active {
                return Err(ApiError::Forbidden("user account is inactive".to_string()));
            }
        }

        let total = req.participants.total();
        let tour_lock = self.store.tours.get(req.tour).await?;
        let mut tour = tour_lock.write().await;

        if !tour.is_active || !tour.is_available {
            return Err(ApiError::Unavailable);
        }

        tour.book_spots(total, req.start_date)?;

        let now = Utc::now();
        let end_date = req
            .start_date
            .checked_add_days(Days::new(u64::from(tour.duration_days)))
            .ok_or_else(|| ApiError::InvalidInput("start date is out of range".to_string()))?;
        let booking = Booking {
            id: BookingId::new(),
            user: user_id,
            tour: req.tour,
            participants: req.participants,
            total_participants: total,
            start_date: req.start_date,
            end_date,
            total_price: tour.price_usd * f64::from(total),
            currency: req.currency,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            emergency_contact: req.emergency_contact,
            special_requests: req.special_requests,
            cancellation_reason: None,
            cancelled_at: None,
            refund_amount: None,
            refunded_at: None,
            created_at: now,
            updated_at: now,
        };

        if let Err(err) = self.store.bookings.insert(booking.id, booking.clone()).await {
            // Roll the charge back so a duplicate id leaves no trace
            tour.release_spots(total, req.start_date);
            return Err(err);
        }
        drop(tour);

        let _ = self.event_bus.publish(DomainEvent::BookingCreated {
            booking_id: booking.id,
            tour_id: booking.tour,
            user_id,
            total_participants: total,
            start_date: booking.start_date,
            total_price: booking.total_price,
            timestamp: now,
        });

        tracing::info!(
            booking_id = %booking.id,
            tour_id = %booking.tour,
            %user_id,
            participants = total,
            "booking created"
        );
        Ok(booking)
    }

    /// Cancels a booking and credits the charged capacity back.
    ///
    /// Capacity is credited before the booking is marked cancelled, so
    /// a crash between the two steps errs on the side of available
    /// spots rather than phantom charges.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotFound`] if the booking does not exist.
    /// - [`ApiError::Forbidden`] if the caller does not own it.
    /// - [`ApiError::InvalidState`] if it is already cancelled or
    ///   completed; nothing is mutated.
    pub async fn cancel_booking(
        &self,
        user_id: UserId,
        booking_id: BookingId,
        reason: Option<String>,
    ) -> Result<Booking, ApiError> {
        if let Some(reason) = &reason
            && reason.len() > MAX_NOTE_LEN
        {
            return Err(ApiError::InvalidInput(
                "cancellation reason cannot exceed 500 characters".to_string(),
            ));
        }

        let booking_lock = self.store.bookings.get(booking_id).await?;
        let mut booking = booking_lock.write().await;

        if booking.user != user_id {
            return Err(ApiError::Forbidden(
                "booking belongs to another user".to_string(),
            ));
        }
        if !booking.is_cancellable() {
            return Err(ApiError::InvalidState(format!(
                "booking {} cannot be cancelled in status {:?}",
                booking.id, booking.status
            )));
        }

        let spots = booking.total_participants;
        match self.store.tours.get(booking.tour).await {
            Ok(tour_lock) => {
                let mut tour = tour_lock.write().await;
                tour.release_spots(spots, booking.start_date);
            }
            Err(_) => {
                tracing::warn!(
                    booking_id = %booking.id,
                    tour_id = %booking.tour,
                    "tour no longer exists; skipping capacity credit"
                );
            }
        }

        let now = Utc::now();
        booking.cancel(reason, now)?;
        let cancelled = booking.clone();
        drop(booking);

        let _ = self.event_bus.publish(DomainEvent::BookingCancelled {
            booking_id,
            tour_id: cancelled.tour,
            spots_released: spots,
            timestamp: now,
        });

        tracing::info!(%booking_id, spots_released = spots, "booking cancelled");
        Ok(cancelled)
    }

    /// Confirms a pending booking. Agency-side action; the caller must
    /// be the agency operating the booked tour.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for a non-agency caller or
    /// [`ApiError::InvalidState`] if the booking is not pending.
    pub async fn confirm_booking(
        &self,
        caller: UserId,
        booking_id: BookingId,
    ) -> Result<Booking, ApiError> {
        let booking_lock = self.store.bookings.get(booking_id).await?;
        let mut booking = booking_lock.write().await;
        self.ensure_tour_agency(caller, booking.tour).await?;
        booking.confirm(Utc::now())?;
        Ok(booking.clone())
    }

    /// Marks a confirmed booking as completed after the tour took place.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for a non-agency caller or
    /// [`ApiError::InvalidState`] if the booking is not confirmed.
    pub async fn complete_booking(
        &self,
        caller: UserId,
        booking_id: BookingId,
    ) -> Result<Booking, ApiError> {
        let booking_lock = self.store.bookings.get(booking_id).await?;
        let mut booking = booking_lock.write().await;
        self.ensure_tour_agency(caller, booking.tour).await?;
        booking.complete(Utc::now())?;
        Ok(booking.clone())
    }

    /// Records a refund on a cancelled or completed booking. When no
    /// amount is given the full booking price is refunded.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for a non-agency caller,
    /// [`ApiError::InvalidState`] for a booking that is neither
    /// cancelled nor completed, or [`ApiError::InvalidInput`] for a
    /// negative amount.
    pub async fn refund_booking(
        &self,
        caller: UserId,
        booking_id: BookingId,
        amount: Option<f64>,
    ) -> Result<Booking, ApiError> {
        let booking_lock = self.store.bookings.get(booking_id).await?;
        let mut booking = booking_lock.write().await;
        self.ensure_tour_agency(caller, booking.tour).await?;
        let amount = amount.unwrap_or(booking.total_price);
        booking.refund(amount, Utc::now())?;
        Ok(booking.clone())
    }

    /// Returns a booking to its owner.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id or
    /// [`ApiError::Forbidden`] for any caller but the owner.
    pub async fn get_booking(
        &self,
        user_id: UserId,
        booking_id: BookingId,
    ) -> Result<Booking, ApiError> {
        let booking_lock = self.store.bookings.get(booking_id).await?;
        let booking = booking_lock.read().await;
        if booking.user != user_id {
            return Err(ApiError::Forbidden(
                "booking belongs to another user".to_string(),
            ));
        }
        Ok(booking.clone())
    }

    /// Lists all bookings owned by the user, newest first.
    pub async fn list_bookings(&self, user_id: UserId) -> Vec<Booking> {
        let mut bookings = self
            .store
            .bookings
            .filter_map(|b| (b.user == user_id).then(|| b.clone()))
            .await;
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bookings
    }

    async fn ensure_tour_agency(&self, caller: UserId, tour_id: TourId) -> Result<(), ApiError> {
        let tour_lock = self.store.tours.get(tour_id).await?;
        let tour = tour_lock.read().await;
        if tour.agency != caller {
            return Err(ApiError::Forbidden(
                "only the operating agency can manage this booking".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::tour::tests::{date, make_tour};
    use crate::domain::user::tests::make_user;
    use crate::domain::{Tour, User, UserRole};

    fn make_request(tour: TourId, adults: u32, start: NaiveDate) -> BookingRequest {
        BookingRequest {
            tour,
            participants: Participants {
                adults,
                children: 0,
                infants: 0,
            },
            start_date: start,
            currency: Currency::Usd,
            emergency_contact: EmergencyContact {
                name: "Asha M".to_string(),
                phone: "+255 700 000 000".to_string(),
                relationship: "sister".to_string(),
            },
            special_requests: None,
        }
    }

    async fn seeded_service(max: u32, spots: u32) -> (ReservationService, User, Tour) {
        let store = Arc::new(EntityStore::new());
        let service = ReservationService::new(Arc::clone(&store), EventBus::new(1000));

        let tourist = make_user(UserRole::Tourist);
        let _ = store.users.insert(tourist.id, tourist.clone()).await;

        let tour = make_tour(max, &[(date(2026, 9, 1), spots)]);
        let _ = store.tours.insert(tour.id, tour.clone()).await;

        (service, tourist, tour)
    }

    #[tokio::test]
    async fn create_booking_derives_fields_and_charges_tour() {
        let (service, tourist, tour) = seeded_service(10, 10).await;
        let start = date(2026, 9, 1);

        let result = service
            .create_booking(tourist.id, make_request(tour.id, 3, start))
            .await;
        let Ok(booking) = result else {
            panic!("booking failed");
        };
        assert_eq!(booking.total_participants, 3);
        assert_eq!(booking.end_date, date(2026, 9, 6));
        assert!((booking.total_price - 3600.0).abs() < f64::EPSILON);
        assert_eq!(booking.status, BookingStatus::Pending);

        let Ok(tour_lock) = service.store.tours.get(tour.id).await else {
            panic!("tour missing");
        };
        let tour = tour_lock.read().await;
        assert_eq!(tour.current_participants, 3);
        let Some(entry) = tour.start_date_entry(start) else {
            panic!("departure missing");
        };
        assert_eq!(entry.available_spots, 7);
    }

    #[tokio::test]
    async fn create_booking_emits_event() {
        let (service, tourist, tour) = seeded_service(10, 10).await;
        let mut rx = service.event_bus.subscribe();

        let result = service
            .create_booking(tourist.id, make_request(tour.id, 2, date(2026, 9, 1)))
            .await;
        assert!(result.is_ok());

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "booking_created");
    }

    #[tokio::test]
    async fn invalid_participants_fail_before_any_charge() {
        let (service, tourist, tour) = seeded_service(10, 10).await;

        let mut req = make_request(tour.id, 1, date(2026, 9, 1));
        req.participants.adults = 0;
        let result = service.create_booking(tourist.id, req).await;
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));

        let Ok(tour_lock) = service.store.tours.get(tour.id).await else {
            panic!("tour missing");
        };
        assert_eq!(tour_lock.read().await.current_participants, 0);
    }

    #[tokio::test]
    async fn withdrawn_tour_is_unavailable() {
        let (service, tourist, tour) = seeded_service(10, 10).await;
        {
            let Ok(tour_lock) = service.store.tours.get(tour.id).await else {
                panic!("tour missing");
            };
            tour_lock.write().await.is_available = false;
        }

        let result = service
            .create_booking(tourist.id, make_request(tour.id, 1, date(2026, 9, 1)))
            .await;
        assert!(matches!(result, Err(ApiError::Unavailable)));
    }

    #[tokio::test]
    async fn unknown_tour_is_not_found() {
        let (service, tourist, _) = seeded_service(10, 10).await;

        let result = service
            .create_booking(tourist.id, make_request(TourId::new(), 1, date(2026, 9, 1)))
            .await;
        assert!(matches!(result, Err(ApiError::NotFound { .. })));
    }

    #[tokio::test]
    async fn concurrent_bookings_never_oversell() {
        let (service, tourist, tour) = seeded_service(5, 5).await;
        let start = date(2026, 9, 1);

        let mut handles = Vec::new();
        for _ in 0..20 {
            let service = service.clone();
            let user_id = tourist.id;
            let tour_id = tour.id;
            handles.push(tokio::spawn(async move {
                service
                    .create_booking(user_id, make_request(tour_id, 1, start))
                    .await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            let Ok(result) = handle.await else {
                panic!("task panicked");
            };
            if result.is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 5);

        let Ok(tour_lock) = service.store.tours.get(tour.id).await else {
            panic!("tour missing");
        };
        let tour = tour_lock.read().await;
        assert_eq!(tour.current_participants, 5);
        let Some(entry) = tour.start_date_entry(start) else {
            panic!("departure missing");
        };
        assert_eq!(entry.available_spots, 0);
    }

    #[tokio::test]
    async fn cancel_restores_both_counters() {
        let (service, tourist, tour) = seeded_service(10, 10).await;
        let start = date(2026, 9, 1);

        let Ok(booking) = service
            .create_booking(tourist.id, make_request(tour.id, 3, start))
            .await
        else {
            panic!("booking failed");
        };

        let result = service
            .cancel_booking(tourist.id, booking.id, Some("rains".to_string()))
            .await;
        let Ok(cancelled) = result else {
            panic!("cancel failed");
        };
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let Ok(tour_lock) = service.store.tours.get(tour.id).await else {
            panic!("tour missing");
        };
        let tour = tour_lock.read().await;
        assert_eq!(tour.current_participants, 0);
        let Some(entry) = tour.start_date_entry(start) else {
            panic!("departure missing");
        };
        assert_eq!(entry.available_spots, 10);
    }

    #[tokio::test]
    async fn cancel_twice_is_invalid_state_and_credits_once() {
        let (service, tourist, tour) = seeded_service(10, 10).await;

        let Ok(booking) = service
            .create_booking(tourist.id, make_request(tour.id, 2, date(2026, 9, 1)))
            .await
        else {
            panic!("booking failed");
        };
        let _ = service.cancel_booking(tourist.id, booking.id, None).await;

        let result = service.cancel_booking(tourist.id, booking.id, None).await;
        assert!(matches!(result, Err(ApiError::InvalidState(_))));

        // A second cancel must not credit capacity again
        let Ok(tour_lock) = service.store.tours.get(tour.id).await else {
            panic!("tour missing");
        };
        assert_eq!(tour_lock.read().await.current_participants, 0);
    }

    #[tokio::test]
    async fn cancel_by_non_owner_is_forbidden() {
        let (service, tourist, tour) = seeded_service(10, 10).await;

        let Ok(booking) = service
            .create_booking(tourist.id, make_request(tour.id, 1, date(2026, 9, 1)))
            .await
        else {
            panic!("booking failed");
        };

        let result = service
            .cancel_booking(UserId::new(), booking.id, None)
            .await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn confirm_requires_operating_agency() {
        let (service, tourist, tour) = seeded_service(10, 10).await;

        let Ok(booking) = service
            .create_booking(tourist.id, make_request(tour.id, 1, date(2026, 9, 1)))
            .await
        else {
            panic!("booking failed");
        };

        let result = service.confirm_booking(UserId::new(), booking.id).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));

        let result = service.confirm_booking(tour.agency, booking.id).await;
        let Ok(confirmed) = result else {
            panic!("confirm failed");
        };
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn refund_defaults_to_full_price() {
        let (service, tourist, tour) = seeded_service(10, 10).await;

        let Ok(booking) = service
            .create_booking(tourist.id, make_request(tour.id, 2, date(2026, 9, 1)))
            .await
        else {
            panic!("booking failed");
        };
        let _ = service.cancel_booking(tourist.id, booking.id, None).await;

        let result = service.refund_booking(tour.agency, booking.id, None).await;
        let Ok(refunded) = result else {
            panic!("refund failed");
        };
        assert_eq!(refunded.refund_amount, Some(booking.total_price));
        assert_eq!(refunded.status, BookingStatus::Refunded);
    }

    #[tokio::test]
    async fn list_bookings_returns_only_own() {
        let (service, tourist, tour) = seeded_service(10, 10).await;
        let other = make_user(UserRole::Tourist);
        let _ = service.store.users.insert(other.id, other.clone()).await;

        let _ = service
            .create_booking(tourist.id, make_request(tour.id, 1, date(2026, 9, 1)))
            .await;
        let _ = service
            .create_booking(other.id, make_request(tour.id, 1, date(2026, 9, 1)))
            .await;

        let own = service.list_bookings(tourist.id).await;
        assert_eq!(own.len(), 1);
        assert!(own.iter().all(|b| b.user == tourist.id));
    }
}
