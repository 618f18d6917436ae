//! Review service: posting reviews and folding scores into rating
//! aggregates.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    BookingId, DomainEvent, EntityStore, EventBus, HelpfulVotes, Review, ReviewId, ReviewRating,
    TourId, UserId,
};
use crate::error::ApiError;

/// Input for [`ReviewService::create_review`].
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    /// Reviewed tour.
    pub tour: TourId,
    /// Booking the review is based on.
    pub booking: BookingId,
    /// Scores, all bounded 1–5.
    pub rating: ReviewRating,
    /// Review title, at most 100 characters.
    pub title: String,
    /// Review body, at most 1000 characters.
    pub comment: String,
    /// Highlights.
    pub pros: Vec<String>,
    /// Drawbacks.
    pub cons: Vec<String>,
}

/// Orchestration layer for reviews and rating aggregates.
#[derive(Debug, Clone)]
pub struct ReviewService {
    store: Arc<EntityStore>,
    event_bus: EventBus,
}

impl ReviewService {
    /// Creates a new `ReviewService`.
    #[must_use]
    pub fn new(store: Arc<EntityStore>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Posts a review and folds its overall score into the tour's and
    /// park's rating aggregates.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidInput`] for out-of-bounds ratings, text
    ///   bounds, or a booking that does not reference the tour.
    /// - [`ApiError::NotFound`] if the tour or booking does not exist.
    /// - [`ApiError::Forbidden`] if the booking belongs to another user.
    /// - [`ApiError::Conflict`] if the user already reviewed this tour
    ///   for the same booking.
    pub async fn create_review(
        &self,
        user_id: UserId,
        req: ReviewRequest,
    ) -> Result<Review, ApiError> {
        let booking_lock = self.store.bookings.get(req.booking).await?;
        // Write lock, not read: held across the duplicate check and the
        // insert so two identical concurrent requests serialize and the
        // second one sees the first one's review.
        let booking = booking_lock.write().await;
        if booking.user != user_id {
            return Err(ApiError::Forbidden(
                "booking belongs to another user".to_string(),
            ));
        }
        if booking.tour != req.tour {
            return Err(ApiError::InvalidInput(
                "booking does not reference this tour".to_string(),
            ));
        }

        let duplicate = self
            .store
            .reviews
            .any(|r| r.user == user_id && r.tour == req.tour && r.booking == req.booking)
            .await;
        if duplicate {
            return Err(ApiError::Conflict(
                "review already exists for this booking".to_string(),
            ));
        }

        let now = Utc::now();
        let review = Review {
            id: ReviewId::new(),
            user: user_id,
            tour: req.tour,
            booking: req.booking,
            rating: req.rating,
            title: req.title,
            comment: req.comment,
            pros: req.pros,
            cons: req.cons,
            is_public: true,
            helpful: HelpfulVotes::default(),
            created_at: now,
        };
        review.validate()?;

        // Fold the score into the tour aggregate under its write lock;
        // capture the park id for the second aggregate.
        let tour_lock = self.store.tours.get(req.tour).await?;
        let (park_id, average, count) = {
            let mut tour = tour_lock.write().await;
            tour.rating.add_score(review.rating.overall);
            tour.updated_at = now;
            (tour.park, tour.rating.average, tour.rating.count)
        };
        if let Ok(park_lock) = self.store.parks.get(park_id).await {
            let mut park = park_lock.write().await;
            park.rating.add_score(review.rating.overall);
            park.updated_at = now;
        }

        self.store.reviews.insert(review.id, review.clone()).await?;
        drop(booking);

        let _ = self.event_bus.publish(DomainEvent::ReviewPosted {
            review_id: review.id,
            tour_id: review.tour,
            user_id,
            overall: review.rating.overall,
            timestamp: now,
        });
        let _ = self.event_bus.publish(DomainEvent::RatingUpdated {
            tour_id: review.tour,
            average,
            count,
            timestamp: now,
        });

        tracing::info!(
            review_id = %review.id,
            tour_id = %review.tour,
            overall = review.rating.overall,
            "review posted"
        );
        Ok(review)
    }

    /// Adds the caller's helpful vote to a review. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown review id.
    pub async fn mark_helpful(
        &self,
        user_id: UserId,
        review_id: ReviewId,
    ) -> Result<Review, ApiError> {
        let review_lock = self.store.reviews.get(review_id).await?;
        let mut review = review_lock.write().await;
        review.mark_helpful(user_id);
        Ok(review.clone())
    }

    /// Removes the caller's helpful vote from a review. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown review id.
    pub async fn unmark_helpful(
        &self,
        user_id: UserId,
        review_id: ReviewId,
    ) -> Result<Review, ApiError> {
        let review_lock = self.store.reviews.get(review_id).await?;
        let mut review = review_lock.write().await;
        review.unmark_helpful(user_id);
        Ok(review.clone())
    }

    /// Lists public reviews for a tour, newest first.
    pub async fn list_reviews_for_tour(&self, tour_id: TourId) -> Vec<Review> {
        let mut reviews = self
            .store
            .reviews
            .filter_map(|r| (r.tour == tour_id && r.is_public).then(|| r.clone()))
            .await;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews
    }

    /// Lists all reviews written by a user, newest first.
    pub async fn list_reviews_by_user(&self, user_id: UserId) -> Vec<Review> {
        let mut reviews = self
            .store
            .reviews
            .filter_map(|r| (r.user == user_id).then(|| r.clone()))
            .await;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::booking::tests::make_booking;
    use crate::domain::park::tests::make_park;
    use crate::domain::tour::tests::{date, make_tour};
    use crate::domain::{Booking, BookingId, Tour};

    fn make_request(tour: TourId, booking: BookingId, overall: u8) -> ReviewRequest {
        ReviewRequest {
            tour,
            booking,
            rating: ReviewRating {
                overall,
                guide: None,
                accommodation: None,
                food: None,
                value: None,
            },
            title: "Great trip".to_string(),
            comment: "Lions at dawn on the second day.".to_string(),
            pros: vec![],
            cons: vec![],
        }
    }

    async fn seeded_service() -> (ReviewService, UserId, Tour, Booking) {
        let store = Arc::new(EntityStore::new());
        let service = ReviewService::new(Arc::clone(&store), EventBus::new(1000));

        let park = make_park();
        let mut tour = make_tour(10, &[(date(2026, 9, 1), 10)]);
        tour.park = park.id;
        let user_id = UserId::new();
        let booking = make_booking(user_id, tour.id, 2);

        let _ = store.parks.insert(park.id, park).await;
        let _ = store.tours.insert(tour.id, tour.clone()).await;
        let _ = store.bookings.insert(booking.id, booking.clone()).await;

        (service, user_id, tour, booking)
    }

    #[tokio::test]
    async fn create_review_updates_tour_and_park_aggregates() {
        let (service, user_id, tour, booking) = seeded_service().await;

        let result = service
            .create_review(user_id, make_request(tour.id, booking.id, 4))
            .await;
        assert!(result.is_ok());

        let Ok(tour_lock) = service.store.tours.get(tour.id).await else {
            panic!("tour missing");
        };
        let rated = tour_lock.read().await;
        assert_eq!(rated.rating.count, 1);
        assert!((rated.rating.average - 4.0).abs() < f64::EPSILON);

        let Ok(park_lock) = service.store.parks.get(rated.park).await else {
            panic!("park missing");
        };
        assert_eq!(park_lock.read().await.rating.count, 1);
    }

    #[tokio::test]
    async fn duplicate_review_conflicts() {
        let (service, user_id, tour, booking) = seeded_service().await;

        let first = service
            .create_review(user_id, make_request(tour.id, booking.id, 5))
            .await;
        assert!(first.is_ok());

        let second = service
            .create_review(user_id, make_request(tour.id, booking.id, 3))
            .await;
        assert!(matches!(second, Err(ApiError::Conflict(_))));

        // The aggregate saw exactly one score
        let Ok(tour_lock) = service.store.tours.get(tour.id).await else {
            panic!("tour missing");
        };
        assert_eq!(tour_lock.read().await.rating.count, 1);
    }

    #[tokio::test]
    async fn concurrent_duplicate_reviews_land_once() {
        let (service, user_id, tour, booking) = seeded_service().await;

        let first = service.clone();
        let second = service.clone();
        let req_a = make_request(tour.id, booking.id, 4);
        let req_b = make_request(tour.id, booking.id, 4);
        let (a, b) = tokio::join!(
            tokio::spawn(async move { first.create_review(user_id, req_a).await }),
            tokio::spawn(async move { second.create_review(user_id, req_b).await }),
        );
        let successes = [a, b]
            .iter()
            .filter(|r| matches!(r, Ok(Ok(_))))
            .count();
        assert_eq!(successes, 1);

        // Exactly one review landed and the aggregate saw one score
        assert_eq!(service.list_reviews_by_user(user_id).await.len(), 1);
        let Ok(tour_lock) = service.store.tours.get(tour.id).await else {
            panic!("tour missing");
        };
        assert_eq!(tour_lock.read().await.rating.count, 1);
    }

    #[tokio::test]
    async fn review_for_someone_elses_booking_is_forbidden() {
        let (service, _, tour, booking) = seeded_service().await;

        let result = service
            .create_review(UserId::new(), make_request(tour.id, booking.id, 5))
            .await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn booking_tour_mismatch_is_rejected() {
        let (service, user_id, _, booking) = seeded_service().await;
        let other_tour = make_tour(10, &[(date(2026, 10, 1), 10)]);
        let _ = service
            .store
            .tours
            .insert(other_tour.id, other_tour.clone())
            .await;

        let result = service
            .create_review(user_id, make_request(other_tour.id, booking.id, 5))
            .await;
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn out_of_bounds_rating_is_rejected() {
        let (service, user_id, tour, booking) = seeded_service().await;

        let result = service
            .create_review(user_id, make_request(tour.id, booking.id, 6))
            .await;
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));

        // Nothing was inserted or aggregated
        assert!(service.store.reviews.is_empty().await);
        let Ok(tour_lock) = service.store.tours.get(tour.id).await else {
            panic!("tour missing");
        };
        assert_eq!(tour_lock.read().await.rating.count, 0);
    }

    #[tokio::test]
    async fn helpful_votes_round_trip() {
        let (service, user_id, tour, booking) = seeded_service().await;
        let Ok(review) = service
            .create_review(user_id, make_request(tour.id, booking.id, 5))
            .await
        else {
            panic!("review failed");
        };

        let voter = UserId::new();
        let Ok(marked) = service.mark_helpful(voter, review.id).await else {
            panic!("mark failed");
        };
        assert_eq!(marked.helpful.count, 1);

        // Voting again is a no-op
        let Ok(marked) = service.mark_helpful(voter, review.id).await else {
            panic!("mark failed");
        };
        assert_eq!(marked.helpful.count, 1);

        let Ok(unmarked) = service.unmark_helpful(voter, review.id).await else {
            panic!("unmark failed");
        };
        assert_eq!(unmarked.helpful.count, 0);
    }

    #[tokio::test]
    async fn tour_listing_hides_private_reviews() {
        let (service, user_id, tour, booking) = seeded_service().await;
        let Ok(review) = service
            .create_review(user_id, make_request(tour.id, booking.id, 5))
            .await
        else {
            panic!("review failed");
        };

        {
            let Ok(review_lock) = service.store.reviews.get(review.id).await else {
                panic!("review missing");
            };
            review_lock.write().await.is_public = false;
        }

        assert!(service.list_reviews_for_tour(tour.id).await.is_empty());
        assert_eq!(service.list_reviews_by_user(user_id).await.len(), 1);
    }
}
